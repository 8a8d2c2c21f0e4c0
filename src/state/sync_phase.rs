/// Phase definitions for the pagination driver
///
/// This module defines every state the driver can be in while walking the
/// orders listing.
use std::fmt;

/// Represents the current phase of a pagination run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    // ===== Entry States =====
    /// No cursor was persisted; start from the first page
    FreshStart,

    /// A cursor was persisted; continue from that exact URL
    Resuming,

    // ===== Active States =====
    /// A page request is in flight
    FetchingPage,

    /// Upstream is rate limiting; waiting for the snooze flag to expire
    Snoozed,

    // ===== Terminal State =====
    /// The last page has been processed and the cursor cleared
    Done,
}

impl SyncPhase {
    /// Returns true once the run has nothing left to fetch
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether the driver may move from this phase to `next`
    pub fn can_transition_to(&self, next: SyncPhase) -> bool {
        use SyncPhase::*;
        matches!(
            (self, next),
            (FreshStart | Resuming, FetchingPage | Snoozed)
                | (Snoozed, FetchingPage | Snoozed)
                | (FetchingPage, FetchingPage | Snoozed | Done)
        )
    }

    /// Returns a stable lowercase name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreshStart => "fresh_start",
            Self::Resuming => "resuming",
            Self::FetchingPage => "fetching_page",
            Self::Snoozed => "snoozed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
