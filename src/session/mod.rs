//! Session-scoped conversation state
//!
//! Provides the per-session transcript registry and the turn-trimming
//! policy that bounds every transcript's length

pub mod store;
pub mod transcript;

pub use store::{SessionConfig, SessionStore};
pub use transcript::{Role, Transcript, Turn};
