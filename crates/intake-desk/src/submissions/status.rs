use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Colour family a status badge is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Warning,
    Info,
    Highlight,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    Clock,
    Phone,
    CheckCircle,
    Cross,
    Eye,
    Target,
    UserCheck,
    UserX,
}

/// Presentation metadata attached to every status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub tone: BadgeTone,
    pub icon: StatusIcon,
}

/// Closed lifecycle of a moderated record.
///
/// Implementations are plain enums; `successors` is the full transition table, so anything it
/// does not list is rejected by the services before reaching the store.
pub trait StatusMachine:
    Copy + Eq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const INITIAL: Self;

    fn all() -> &'static [Self];

    fn label(self) -> &'static str;

    fn successors(self) -> &'static [Self];

    fn badge(self) -> StatusBadge;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::all()
            .iter()
            .copied()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }

    fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

/// Lifecycle of a quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Contacted,
    Completed,
    Cancelled,
}

impl StatusMachine for QuoteStatus {
    const INITIAL: Self = Self::Pending;

    fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Contacted,
            Self::Completed,
            Self::Cancelled,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Contacted, Self::Completed, Self::Cancelled],
            Self::Contacted => &[Self::Completed, Self::Cancelled],
            Self::Completed => &[Self::Cancelled],
            Self::Cancelled => &[],
        }
    }

    fn badge(self) -> StatusBadge {
        let (tone, icon) = match self {
            Self::Pending => (BadgeTone::Warning, StatusIcon::Clock),
            Self::Contacted => (BadgeTone::Info, StatusIcon::Phone),
            Self::Completed => (BadgeTone::Success, StatusIcon::CheckCircle),
            Self::Cancelled => (BadgeTone::Danger, StatusIcon::Cross),
        };
        StatusBadge { tone, icon }
    }
}

/// Lifecycle of an internship application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternshipStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Accepted,
    Rejected,
}

impl StatusMachine for InternshipStatus {
    const INITIAL: Self = Self::Pending;

    fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Reviewed,
            Self::Shortlisted,
            Self::Accepted,
            Self::Rejected,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Shortlisted => "shortlisted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[
                Self::Reviewed,
                Self::Shortlisted,
                Self::Accepted,
                Self::Rejected,
            ],
            Self::Reviewed => &[Self::Shortlisted, Self::Accepted, Self::Rejected],
            Self::Shortlisted => &[Self::Accepted, Self::Rejected],
            Self::Accepted | Self::Rejected => &[],
        }
    }

    fn badge(self) -> StatusBadge {
        let (tone, icon) = match self {
            Self::Pending => (BadgeTone::Warning, StatusIcon::Clock),
            Self::Reviewed => (BadgeTone::Info, StatusIcon::Eye),
            Self::Shortlisted => (BadgeTone::Highlight, StatusIcon::Target),
            Self::Accepted => (BadgeTone::Success, StatusIcon::UserCheck),
            Self::Rejected => (BadgeTone::Danger, StatusIcon::UserX),
        };
        StatusBadge { tone, icon }
    }
}
