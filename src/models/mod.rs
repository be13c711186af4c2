//! Data models for gaan
//!
//! Catalog rows, the client-facing track view and the per-session
//! conversation context.

mod session;
mod track;

pub use session::SessionContext;
pub use track::{Column, RawTrackRow, TrackRecord, TrackView};
