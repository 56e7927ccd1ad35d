//! Visitor submissions: record shapes, status lifecycles, and the services that persist them.

pub mod domain;
pub mod error;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
pub(crate) mod tests;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::store::DocumentStore;

pub use domain::{
    BlogAuthor, BlogPost, ContactForm, ContactSubmission, InternshipApplication, InternshipForm,
    Moderated, NewContactSubmission, NewInternshipApplication, NewQuoteRequest, QuoteForm,
    QuoteRequest, SubmissionKind, Submittable, DEFAULT_CONTACT_METHOD,
};
pub use error::{SubmissionError, ValidationError};
pub use router::{submission_error_response, submission_router};
pub use service::{
    parse_status, BlogService, ContactService, InternshipService, QuoteService, SubmissionService,
};
pub use status::{BadgeTone, InternshipStatus, QuoteStatus, StatusBadge, StatusIcon, StatusMachine};

/// One service per collection, all sharing a store and clock.
pub struct IntakeServices<S: ?Sized> {
    pub quotes: SubmissionService<QuoteRequest, S>,
    pub contacts: SubmissionService<ContactSubmission, S>,
    pub internships: SubmissionService<InternshipApplication, S>,
    pub blog: SubmissionService<BlogPost, S>,
    pub clock: Arc<dyn Clock>,
}

impl<S> IntakeServices<S>
where
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            quotes: SubmissionService::with_clock(Arc::clone(&store), Arc::clone(&clock)),
            contacts: SubmissionService::with_clock(Arc::clone(&store), Arc::clone(&clock)),
            internships: SubmissionService::with_clock(Arc::clone(&store), Arc::clone(&clock)),
            blog: SubmissionService::with_clock(store, Arc::clone(&clock)),
            clock,
        }
    }
}
