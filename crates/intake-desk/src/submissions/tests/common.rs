use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Map, Value};

use crate::clock::{format_timestamp, Clock};
use crate::store::{DocumentId, DocumentStore, MemoryDocumentStore};
use crate::submissions::{ContactForm, IntakeServices, InternshipForm, QuoteForm};

/// Clock that advances one minute on every reading, so consecutive submissions never tie.
pub(crate) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub(crate) fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
            step: Duration::minutes(1),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock mutex poisoned");
        let current = *next;
        *next = current + self.step;
        current
    }
}

pub(crate) fn start_of_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

pub(crate) fn build_services() -> (
    Arc<MemoryDocumentStore>,
    IntakeServices<MemoryDocumentStore>,
) {
    let store = Arc::new(MemoryDocumentStore::default());
    let services = IntakeServices::with_clock(
        store.clone(),
        Arc::new(SteppingClock::starting_at(start_of_day())),
    );
    (store, services)
}

pub(crate) fn quote_form(name: &str, phone: &str) -> QuoteForm {
    QuoteForm {
        name: Some(name.to_string()),
        phone: Some(phone.to_string()),
    }
}

pub(crate) fn contact_form(full_name: &str, project_type: &str) -> ContactForm {
    ContactForm {
        full_name: Some(full_name.to_string()),
        email: Some(format!(
            "{}@example.com",
            full_name.to_lowercase().replace(' ', ".")
        )),
        project_type: Some(project_type.to_string()),
        budget: Some("Student / Low-budget project".to_string()),
        timeline: Some("1-2 months".to_string()),
        message: Some("Looking for help with a launch".to_string()),
        ..ContactForm::default()
    }
}

pub(crate) fn internship_form(full_name: &str, track: &str) -> InternshipForm {
    InternshipForm {
        full_name: Some(full_name.to_string()),
        email: Some(format!("{}@example.com", full_name.to_lowercase())),
        preferred_track: Some(track.to_string()),
        preferred_duration: Some("3 months".to_string()),
        preferred_mode: Some("Remote".to_string()),
        current_level: Some("Student / Beginner".to_string()),
        motivation: Some("Ship real projects".to_string()),
        ..InternshipForm::default()
    }
}

/// Writes a blog post straight into the store, the way the publishing tool would.
pub(crate) async fn seed_blog_post(
    store: &MemoryDocumentStore,
    title: &str,
    category: &str,
    published_at: DateTime<Utc>,
) -> DocumentId {
    let fields: Map<String, Value> = match json!({
        "title": title,
        "category": category,
        "author": { "name": "Studio Team" },
        "publishedAt": format_timestamp(published_at),
    }) {
        Value::Object(fields) => fields,
        _ => unreachable!("literal is an object"),
    };
    store
        .create("blogPosts", fields)
        .await
        .expect("blog post seeded")
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
