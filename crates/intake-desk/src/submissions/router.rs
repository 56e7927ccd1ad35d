use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::{ContactForm, InternshipForm, QuoteForm};
use super::error::SubmissionError;
use super::IntakeServices;
use crate::store::{DocumentId, DocumentStore};

/// Public form endpoints.
pub fn submission_router<S>(services: Arc<IntakeServices<S>>) -> Router
where
    S: DocumentStore + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/quotes", post(submit_quote::<S>))
        .route("/api/v1/contact", post(submit_contact::<S>))
        .route("/api/v1/internships", post(submit_internship::<S>))
        .with_state(services)
}

pub(crate) async fn submit_quote<S>(
    State(services): State<Arc<IntakeServices<S>>>,
    Json(form): Json<QuoteForm>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    created(services.quotes.submit(form).await)
}

pub(crate) async fn submit_contact<S>(
    State(services): State<Arc<IntakeServices<S>>>,
    Json(form): Json<ContactForm>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    created(services.contacts.submit(form).await)
}

pub(crate) async fn submit_internship<S>(
    State(services): State<Arc<IntakeServices<S>>>,
    Json(form): Json<InternshipForm>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    created(services.internships.submit(form).await)
}

fn created(result: Result<DocumentId, SubmissionError>) -> Response {
    match result {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(err) => submission_error_response(err),
    }
}

/// Validation problems are the caller's to fix (422); store failures are ours (500). Neither is
/// retried here.
pub fn submission_error_response(err: SubmissionError) -> Response {
    match err {
        SubmissionError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        SubmissionError::Store(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
