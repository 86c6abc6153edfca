//! Family journal service
//!
//! Families and their journal entries live in process memory; each new
//! entry gets one AI-generated insight from the completion gateway, with a
//! fixed fallback text when the gateway is unavailable.

pub mod api;
pub mod insight;
pub mod store;

pub use api::{create_router, serve};
pub use store::FamilyStore;
