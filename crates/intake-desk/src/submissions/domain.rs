use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::status::{InternshipStatus, QuoteStatus, StatusMachine};
use crate::clock::format_timestamp;
use crate::store::DocumentId;

/// A record kind living in its own store collection.
pub trait SubmissionKind: Clone + Send + Sync + DeserializeOwned + 'static {
    const COLLECTION: &'static str;
    /// Field the collection is listed by, newest first.
    const TIMESTAMP_FIELD: &'static str;
    /// Human readable name used in logs and errors.
    const NAME: &'static str;

    fn id(&self) -> &DocumentId;
}

/// Kinds that visitors can create through a form.
pub trait Submittable: SubmissionKind {
    type Form: Send;
    /// Fully populated document body, including the server-stamped fields.
    type New: Serialize + Send;

    fn normalize(form: Self::Form, submitted_at: DateTime<Utc>)
        -> Result<Self::New, ValidationError>;
}

/// Kinds whose `status` field is moved through a [`StatusMachine`] by operators.
pub trait Moderated: SubmissionKind {
    type Status: StatusMachine;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .ok_or(ValidationError::MissingField { field })
}

fn optional(value: Option<String>) -> String {
    value.map(|raw| raw.trim().to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------------------------
// Quote requests

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: DocumentId,
    pub name: String,
    pub phone: String,
    pub submitted_at: DateTime<Utc>,
    pub status: QuoteStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteForm {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuoteRequest {
    pub name: String,
    pub phone: String,
    pub submitted_at: String,
    pub status: QuoteStatus,
}

impl SubmissionKind for QuoteRequest {
    const COLLECTION: &'static str = "quote-requests";
    const TIMESTAMP_FIELD: &'static str = "submittedAt";
    const NAME: &'static str = "quote request";

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Submittable for QuoteRequest {
    type Form = QuoteForm;
    type New = NewQuoteRequest;

    fn normalize(
        form: QuoteForm,
        submitted_at: DateTime<Utc>,
    ) -> Result<NewQuoteRequest, ValidationError> {
        Ok(NewQuoteRequest {
            name: required("name", form.name)?,
            phone: required("phone", form.phone)?,
            submitted_at: format_timestamp(submitted_at),
            status: QuoteStatus::INITIAL,
        })
    }
}

impl Moderated for QuoteRequest {
    type Status = QuoteStatus;

    fn status(&self) -> QuoteStatus {
        self.status
    }

    fn set_status(&mut self, status: QuoteStatus) {
        self.status = status;
    }
}

// ---------------------------------------------------------------------------------------------
// Contact submissions

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: DocumentId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub organization: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    #[serde(default)]
    pub start_date: String,
    pub contact_method: String,
    #[serde(default)]
    pub links: String,
    pub message: String,
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default)]
    pub terms_accepted: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub start_date: Option<String>,
    pub contact_method: Option<String>,
    pub links: Option<String>,
    pub message: Option<String>,
    pub newsletter: Option<bool>,
    pub terms_accepted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub start_date: String,
    pub contact_method: String,
    pub links: String,
    pub message: String,
    pub newsletter: bool,
    pub terms_accepted: bool,
    pub submitted_at: String,
}

/// Used when the visitor leaves the preferred contact channel unselected.
pub const DEFAULT_CONTACT_METHOD: &str = "email";

impl SubmissionKind for ContactSubmission {
    const COLLECTION: &'static str = "contactSubmissions";
    const TIMESTAMP_FIELD: &'static str = "submittedAt";
    const NAME: &'static str = "contact submission";

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Submittable for ContactSubmission {
    type Form = ContactForm;
    type New = NewContactSubmission;

    fn normalize(
        form: ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> Result<NewContactSubmission, ValidationError> {
        let contact_method = optional(form.contact_method);
        Ok(NewContactSubmission {
            full_name: required("fullName", form.full_name)?,
            email: required("email", form.email)?,
            phone: optional(form.phone),
            organization: optional(form.organization),
            project_type: required("projectType", form.project_type)?,
            budget: required("budget", form.budget)?,
            timeline: required("timeline", form.timeline)?,
            start_date: optional(form.start_date),
            contact_method: if contact_method.is_empty() {
                DEFAULT_CONTACT_METHOD.to_string()
            } else {
                contact_method
            },
            links: optional(form.links),
            message: required("message", form.message)?,
            newsletter: form.newsletter.unwrap_or(false),
            terms_accepted: form.terms_accepted.unwrap_or(false),
            submitted_at: format_timestamp(submitted_at),
        })
    }
}

// ---------------------------------------------------------------------------------------------
// Internship applications

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipApplication {
    pub id: DocumentId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub organization: String,
    pub preferred_track: String,
    pub preferred_duration: String,
    pub preferred_mode: String,
    pub current_level: String,
    pub motivation: String,
    #[serde(default)]
    pub current_skills: String,
    #[serde(default)]
    pub portfolio_links: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub daily_time_commitment: String,
    #[serde(default)]
    pub open_to_related_tracks: bool,
    #[serde(default)]
    pub receive_updates: bool,
    pub submitted_at: DateTime<Utc>,
    pub status: InternshipStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InternshipForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub preferred_track: Option<String>,
    pub preferred_duration: Option<String>,
    pub preferred_mode: Option<String>,
    pub current_level: Option<String>,
    pub motivation: Option<String>,
    pub current_skills: Option<String>,
    pub portfolio_links: Option<String>,
    pub start_date: Option<String>,
    pub daily_time_commitment: Option<String>,
    pub open_to_related_tracks: Option<bool>,
    pub receive_updates: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInternshipApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub preferred_track: String,
    pub preferred_duration: String,
    pub preferred_mode: String,
    pub current_level: String,
    pub motivation: String,
    pub current_skills: String,
    pub portfolio_links: String,
    pub start_date: String,
    pub daily_time_commitment: String,
    pub open_to_related_tracks: bool,
    pub receive_updates: bool,
    pub submitted_at: String,
    pub status: InternshipStatus,
}

impl SubmissionKind for InternshipApplication {
    const COLLECTION: &'static str = "internshipApplications";
    const TIMESTAMP_FIELD: &'static str = "submittedAt";
    const NAME: &'static str = "internship application";

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Submittable for InternshipApplication {
    type Form = InternshipForm;
    type New = NewInternshipApplication;

    fn normalize(
        form: InternshipForm,
        submitted_at: DateTime<Utc>,
    ) -> Result<NewInternshipApplication, ValidationError> {
        Ok(NewInternshipApplication {
            full_name: required("fullName", form.full_name)?,
            email: required("email", form.email)?,
            phone: optional(form.phone),
            organization: optional(form.organization),
            preferred_track: required("preferredTrack", form.preferred_track)?,
            preferred_duration: required("preferredDuration", form.preferred_duration)?,
            preferred_mode: required("preferredMode", form.preferred_mode)?,
            current_level: required("currentLevel", form.current_level)?,
            motivation: required("motivation", form.motivation)?,
            current_skills: optional(form.current_skills),
            portfolio_links: optional(form.portfolio_links),
            start_date: optional(form.start_date),
            daily_time_commitment: optional(form.daily_time_commitment),
            open_to_related_tracks: form.open_to_related_tracks.unwrap_or(false),
            receive_updates: form.receive_updates.unwrap_or(false),
            submitted_at: format_timestamp(submitted_at),
            status: InternshipStatus::INITIAL,
        })
    }
}

impl Moderated for InternshipApplication {
    type Status = InternshipStatus;

    fn status(&self) -> InternshipStatus {
        self.status
    }

    fn set_status(&mut self, status: InternshipStatus) {
        self.status = status;
    }
}

// ---------------------------------------------------------------------------------------------
// Blog posts (listed by the admin console, authored elsewhere)

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAuthor {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: BlogAuthor,
    pub published_at: DateTime<Utc>,
}

impl SubmissionKind for BlogPost {
    const COLLECTION: &'static str = "blogPosts";
    const TIMESTAMP_FIELD: &'static str = "publishedAt";
    const NAME: &'static str = "blog post";

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
