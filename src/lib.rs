//! GenerationGap demo services
//!
//! Two small web applications sharing one OpenRouter completion gateway:
//! - An AI therapist chat relay with per-session conversation memory,
//!   trimmed to a fixed turn ceiling after every append
//! - A family journal service that annotates each entry with one
//!   AI-generated insight
//!
//! All state is process-local and in memory; nothing survives a restart.

pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod journal;
pub mod models;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use session::{SessionConfig, SessionStore};
