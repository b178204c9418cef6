//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod actionable;
pub mod health;
