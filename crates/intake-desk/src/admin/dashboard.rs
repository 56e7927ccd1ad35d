use chrono::NaiveDate;
use serde::Serialize;

use crate::submissions::{BlogPost, ContactSubmission};

/// Headline counters shown on the admin landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub blog_posts: usize,
    pub contact_submissions: usize,
    pub newsletter_subscribers: usize,
    /// Contact forms submitted on `today` (UTC calendar day).
    pub submitted_today: usize,
}

impl DashboardSummary {
    pub fn compute(posts: &[BlogPost], contacts: &[ContactSubmission], today: NaiveDate) -> Self {
        Self {
            blog_posts: posts.len(),
            contact_submissions: contacts.len(),
            newsletter_subscribers: contacts.iter().filter(|contact| contact.newsletter).count(),
            submitted_today: contacts
                .iter()
                .filter(|contact| contact.submitted_at.date_naive() == today)
                .count(),
        }
    }
}
