//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for query strings
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ActivityQueryParams, DestroyParams, DirectoryParams, WhoActionedQuery, DEFAULT_LIMIT, MAX_LIMIT,
};

pub use responses::{
    ActionableStateResponse, ActivityItemResponse, ActorResponse, DirectoryResponse, HealthChecks,
    HealthResponse, PaginatedResponse, PaginationMeta, ReadinessResponse, ToggleFailure,
    ToggleResponse, UserCountResponse, UserStatsResponse, UserSummaryResponse,
};
