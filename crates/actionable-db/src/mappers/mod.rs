//! Entity to model mappers
//!
//! `From`/`TryFrom` conversions from database rows to domain types. Fallible
//! conversions surface corrupt rows as `DomainError::Database`.

mod action;
mod post;
mod stats;
mod user;
