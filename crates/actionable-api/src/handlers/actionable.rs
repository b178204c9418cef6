//! Actionable handlers
//!
//! Toggle endpoints, per-post reads, user summaries and the directory.

use actionable_core::{ActivityKind, DomainEvent};
use actionable_service::{
    ActionableService, ActionableStateResponse, ActivityItemResponse, ActivityQueryParams,
    ActorResponse, DestroyParams, DirectoryParams, DirectoryResponse, PaginatedResponse,
    ServiceResult, ToggleOutcome, UserStatsResponse, UserSummaryResponse, WhoActionedQuery,
};
use axum::extract::{Path, State};
use tracing::warn;

use crate::extractors::{AuthUser, OptionalAuthUser, PostIdPath, UserIdPath, ValidatedQuery};
use crate::response::{ApiJson, ApiResult, ToggleReply};
use crate::state::AppState;

/// Fan the committed change out to connected clients
async fn publish(state: &AppState, event: &DomainEvent) {
    if let Err(e) = state.service_context().publisher().publish(event).await {
        warn!(
            error = %e,
            post_id = %event.payload().post_id,
            event = event.event_type(),
            "Failed to publish actionable event"
        );
    }
}

async fn reply(state: &AppState, result: ServiceResult<ToggleOutcome>) -> ToggleReply {
    match result {
        Ok(outcome) => {
            publish(state, &outcome.event).await;
            ToggleReply::Applied(outcome.response())
        }
        Err(e) => ToggleReply::Rejected(e),
    }
}

/// Mark a post actionable
///
/// POST /actionable/{post_id}
pub async fn create_actionable(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<ToggleReply> {
    let post_id = path.post_id()?;

    let service = ActionableService::new(state.service_context());
    let result = service.create(auth.user_id(), post_id).await;
    Ok(reply(&state, result).await)
}

/// Remove a mark; staff may name another author with `?user_id=`
///
/// DELETE /actionable/{post_id}
pub async fn destroy_actionable(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
    ValidatedQuery(params): ValidatedQuery<DestroyParams>,
) -> ApiResult<ToggleReply> {
    let post_id = path.post_id()?;

    let service = ActionableService::new(state.service_context());
    let result = service.destroy(auth.user_id(), post_id, params.user_id).await;
    Ok(reply(&state, result).await)
}

/// Per-post state for the caller
///
/// GET /actionable/{post_id}
pub async fn get_status(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<ApiJson<ActionableStateResponse>> {
    let post_id = path.post_id()?;

    let service = ActionableService::new(state.service_context());
    let status = service.status(auth.user_id(), post_id).await?;
    Ok(ApiJson(status))
}

/// Users who marked a post
///
/// GET /actionable/{post_id}/who
pub async fn who_actioned(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostIdPath>,
    ValidatedQuery(query): ValidatedQuery<WhoActionedQuery>,
) -> ApiResult<ApiJson<Vec<ActorResponse>>> {
    let post_id = path.post_id()?;

    let service = ActionableService::new(state.service_context());
    let actors = service
        .who_actioned(auth.user_id(), post_id, query.limit())
        .await?;
    Ok(ApiJson(actors))
}

/// GET /actionable/users/{user_id}/summary
pub async fn user_summary(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<ApiJson<UserSummaryResponse>> {
    let user_id = path.user_id()?;

    let service = ActionableService::new(state.service_context());
    let summary = service.user_summary(user_id).await?;
    Ok(ApiJson(summary))
}

/// GET /actionable/users/{user_id}/given
pub async fn given_activity(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    ValidatedQuery(params): ValidatedQuery<ActivityQueryParams>,
) -> ApiResult<ApiJson<PaginatedResponse<ActivityItemResponse>>> {
    activity(&state, &path, ActivityKind::Given, &params).await
}

/// GET /actionable/users/{user_id}/received
pub async fn received_activity(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    ValidatedQuery(params): ValidatedQuery<ActivityQueryParams>,
) -> ApiResult<ApiJson<PaginatedResponse<ActivityItemResponse>>> {
    activity(&state, &path, ActivityKind::Received, &params).await
}

async fn activity(
    state: &AppState,
    path: &UserIdPath,
    kind: ActivityKind,
    params: &ActivityQueryParams,
) -> ApiResult<ApiJson<PaginatedResponse<ActivityItemResponse>>> {
    let user_id = path.user_id()?;

    let service = ActionableService::new(state.service_context());
    let page = service
        .activity(user_id, kind, params.limit(), params.before)
        .await?;
    Ok(ApiJson(page))
}

/// Users ranked by marks in a period, e.g. `?period=weekly&kind=received`
///
/// GET /actionable/directory
pub async fn directory(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<DirectoryParams>,
) -> ApiResult<ApiJson<DirectoryResponse>> {
    let service = ActionableService::new(state.service_context());
    let ranking = service
        .directory(params.period, params.kind(), params.limit())
        .await?;
    Ok(ApiJson(ranking))
}

/// Recompute a user's aggregates (staff only)
///
/// POST /actionable/admin/users/{user_id}/reconcile
pub async fn reconcile_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<UserIdPath>,
) -> ApiResult<ApiJson<UserStatsResponse>> {
    let user_id = path.user_id()?;

    let service = ActionableService::new(state.service_context());
    let stats = service.reconcile_stats(Some(auth.user_id), user_id).await?;
    Ok(ApiJson(stats))
}
