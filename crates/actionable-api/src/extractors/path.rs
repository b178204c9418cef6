//! Path parameter extractors
//!
//! Typed ids are parsed from strings so a malformed id answers 400 with the
//! standard error envelope instead of axum's plain-text rejection.

use actionable_core::{PostId, UserId};
use serde::Deserialize;

use crate::response::ApiError;

/// Path parameters with post_id
#[derive(Debug, Deserialize)]
pub struct PostIdPath {
    pub post_id: String,
}

impl PostIdPath {
    /// Parse post_id
    pub fn post_id(&self) -> Result<PostId, ApiError> {
        self.post_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid post_id format"))
    }
}

/// Path parameters with user_id
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        self.user_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
