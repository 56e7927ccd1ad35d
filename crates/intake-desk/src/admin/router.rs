use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::controller::{AdminListView, ControllerError, ListRow, LoadState, ModerationRow};
use super::dashboard::DashboardSummary;
use super::guard::{require_admin_session, session_cookie, AccessGuard};
use super::pending::PendingWrites;
use super::search::{filter_records, Searchable};
use crate::error::AppError;
use crate::store::{DocumentId, DocumentStore};
use crate::submissions::{
    submission_error_response, IntakeServices, Moderated, StatusMachine, SubmissionError,
};

/// Shared state behind the admin console endpoints.
pub struct AdminState<S: ?Sized> {
    pub services: Arc<IntakeServices<S>>,
    pub guard: Arc<AccessGuard>,
    /// Passcode accepted by `/login`; when unset any passcode signs in.
    pub passcode: Option<String>,
    /// Quote and internship records with a status write pending, one write per record.
    pub quote_writes: PendingWrites,
    pub internship_writes: PendingWrites,
}

impl<S: ?Sized> AdminState<S> {
    pub fn new(
        services: Arc<IntakeServices<S>>,
        guard: AccessGuard,
        passcode: Option<String>,
    ) -> Self {
        Self {
            services,
            guard: Arc::new(guard),
            passcode,
            quote_writes: PendingWrites::default(),
            internship_writes: PendingWrites::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub passcode: Option<String>,
}

/// Admin list, moderation, and dashboard endpoints behind the session guard, plus the
/// unguarded login and logout routes.
pub fn admin_router<S>(state: Arc<AdminState<S>>) -> Router
where
    S: DocumentStore + ?Sized + 'static,
{
    let guarded = Router::new()
        .route("/admin/api/quotes", get(list_quotes::<S>))
        .route("/admin/api/quotes/:id/status", patch(update_quote_status::<S>))
        .route("/admin/api/internships", get(list_internships::<S>))
        .route(
            "/admin/api/internships/:id/status",
            patch(update_internship_status::<S>),
        )
        .route("/admin/api/contacts", get(list_contacts::<S>))
        .route("/admin/api/blog", get(list_blog::<S>))
        .route("/admin/api/dashboard", get(dashboard::<S>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.guard),
            require_admin_session,
        ));

    Router::new()
        .merge(guarded)
        .route("/login", post(login::<S>))
        .route("/logout", post(logout::<S>))
        .with_state(state)
}

async fn list_quotes<S>(
    State(state): State<Arc<AdminState<S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    moderation_list(state.services.quotes.list().await, &params.q)
}

async fn list_internships<S>(
    State(state): State<Arc<AdminState<S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    moderation_list(state.services.internships.list().await, &params.q)
}

async fn list_contacts<S>(
    State(state): State<Arc<AdminState<S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    plain_list(state.services.contacts.list().await, &params.q)
}

async fn list_blog<S>(
    State(state): State<Arc<AdminState<S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    plain_list(state.services.blog.list().await, &params.q)
}

async fn update_quote_status<S>(
    State(state): State<Arc<AdminState<S>>>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    let id = DocumentId(id);
    let write = state
        .services
        .quotes
        .update_status_label(&id, &change.status);
    let result = claimed_write(&state.quote_writes, &id, write).await;
    status_changed(&id, result)
}

async fn update_internship_status<S>(
    State(state): State<Arc<AdminState<S>>>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    let id = DocumentId(id);
    let write = state
        .services
        .internships
        .update_status_label(&id, &change.status);
    let result = claimed_write(&state.internship_writes, &id, write).await;
    status_changed(&id, result)
}

async fn dashboard<S>(State(state): State<Arc<AdminState<S>>>) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    let posts = match state.services.blog.list().await {
        Ok(posts) => posts,
        Err(err) => return submission_error_response(err),
    };
    let contacts = match state.services.contacts.list().await {
        Ok(contacts) => contacts,
        Err(err) => return submission_error_response(err),
    };

    let today = state.services.clock.now().date_naive();
    Json(DashboardSummary::compute(&posts, &contacts, today)).into_response()
}

async fn login<S>(
    State(state): State<Arc<AdminState<S>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    let accepted = match state.passcode.as_deref() {
        Some(expected) => request.passcode.as_deref().map(str::trim) == Some(expected),
        None => true,
    };

    if !accepted {
        warn!("admin login rejected");
        let payload = json!({ "error": "invalid passcode" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    }

    info!("admin signed in");
    (
        [(header::SET_COOKIE, session_cookie(true))],
        Json(json!({ "signedIn": true })),
    )
        .into_response()
}

async fn logout<S>(State(state): State<Arc<AdminState<S>>>) -> Response
where
    S: DocumentStore + ?Sized + 'static,
{
    info!("admin signed out");
    (
        [(header::SET_COOKIE, session_cookie(false))],
        Redirect::to(&state.guard.login_path),
    )
        .into_response()
}

fn plain_list<K>(result: Result<Vec<K>, SubmissionError>, query: &str) -> Response
where
    K: Searchable + Clone + Serialize,
{
    match result {
        Ok(records) => {
            let rows: Vec<ListRow<K>> = filter_records(&records, query)
                .into_iter()
                .map(|record| ListRow {
                    record: record.clone(),
                    busy: false,
                })
                .collect();
            Json(AdminListView {
                state: LoadState::Ready,
                total: records.len(),
                rows,
            })
            .into_response()
        }
        Err(err) => submission_error_response(err),
    }
}

fn moderation_list<K>(result: Result<Vec<K>, SubmissionError>, query: &str) -> Response
where
    K: Moderated + Searchable + Serialize,
{
    match result {
        Ok(records) => {
            let rows: Vec<ModerationRow<K>> = filter_records(&records, query)
                .into_iter()
                .map(|record| {
                    let status = record.status();
                    ModerationRow {
                        record: record.clone(),
                        busy: false,
                        badge: status.badge(),
                        actions: status.successors().to_vec(),
                    }
                })
                .collect();
            Json(AdminListView {
                state: LoadState::Ready,
                total: records.len(),
                rows,
            })
            .into_response()
        }
        Err(err) => submission_error_response(err),
    }
}

/// Run `write` only if no other status write on `id` is pending.
async fn claimed_write<T, F>(
    pending: &PendingWrites,
    id: &DocumentId,
    write: F,
) -> Result<T, ControllerError>
where
    F: Future<Output = Result<T, SubmissionError>>,
{
    let _pending = pending.claim(id).inspect_err(|err| warn!(%id, "{err}"))?;
    Ok(write.await?)
}

fn status_changed<T: StatusMachine>(
    id: &DocumentId,
    result: Result<T, ControllerError>,
) -> Response {
    match result {
        Ok(status) => Json(json!({
            "id": id,
            "status": status,
            "badge": status.badge(),
        }))
        .into_response(),
        Err(ControllerError::Submission(err)) => submission_error_response(err),
        Err(err) => AppError::from(err).into_response(),
    }
}
