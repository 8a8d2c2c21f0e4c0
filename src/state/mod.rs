//! State module for tracking sync progress
//!
//! # Components
//!
//! - `SyncPhase`: the pagination driver's state machine
//! - `ResumeCursor`: the persisted next-page URL that makes runs resumable
//! - `SeenMarker`: durable keys recording which orders and customers were reported

mod markers;
mod sync_phase;

pub use markers::{ResumeCursor, SeenMarker, CURSOR_KEY};
pub use sync_phase::SyncPhase;
