//! Operator-facing side: list views over the submission collections, moderation, and the gate in
//! front of them.

pub mod cache;
pub mod controller;
pub mod dashboard;
pub mod guard;
pub mod pending;
pub mod router;
pub mod search;

pub use cache::RecordCache;
pub use controller::{
    AdminListController, AdminListView, ControllerError, ListRow, LoadState, ModerationRow,
};
pub use dashboard::DashboardSummary;
pub use guard::{
    has_session_flag, require_admin_session, session_cookie, AccessGuard, GuardDecision,
    SESSION_COOKIE,
};
pub use pending::{PendingWrite, PendingWrites};
pub use router::{admin_router, AdminState, LoginRequest, SearchParams, StatusChange};
pub use search::{filter_records, matches_query, Searchable};
