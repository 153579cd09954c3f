use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::application::services::FolderSearch;
use crate::domain::{FolderSort, PageRequest};
use crate::presentation::state::AppState;

use super::dto::{
    FolderCreatedResponse, FolderDetailResponse, FolderListResponse, FolderNameRequest,
    FolderSearchQuery, LikeResponse, PageQuery, StatusResponse,
};
use super::error::ApiError;
use super::extract::{AuthUser, OptionalUser};

#[tracing::instrument(skip(state, request), fields(owner = %owner))]
pub async fn create_folder_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Json(request): Json<FolderNameRequest>,
) -> Result<(StatusCode, Json<FolderCreatedResponse>), ApiError> {
    let folder = state
        .folder_service
        .create(&owner, &request.folder_name)
        .await?;

    tracing::info!(folder_id = %folder.id, "Folder created");
    Ok((
        StatusCode::CREATED,
        Json(FolderCreatedResponse {
            status: "ok",
            folder_id: folder.id.to_string(),
        }),
    ))
}

/// `PATCH /v1/folder/{folder_id}`
#[tracing::instrument(skip(state, request), fields(owner = %owner))]
pub async fn rename_folder_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(folder_id): Path<String>,
    Json(request): Json<FolderNameRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .folder_service
        .rename(&owner, &folder_id, &request.folder_name)
        .await?;
    Ok(Json(StatusResponse::ok()))
}

#[tracing::instrument(skip(state), fields(owner = %owner))]
pub async fn delete_folder_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(folder_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.folder_service.delete(&owner, &folder_id).await?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn toggle_like_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(folder_id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let toggle = state.folder_service.toggle_like(&user, &folder_id).await?;
    Ok(Json(LikeResponse {
        status: "ok",
        action: toggle.as_str(),
    }))
}

/// `GET /v1/folder/liked?page`
pub async fn liked_folders_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<FolderListResponse>, ApiError> {
    let page = state
        .folder_service
        .liked_by(&user, PageRequest::from(query.page))
        .await?;
    Ok(Json(page.into()))
}

pub async fn search_folder_handler(
    State(state): State<AppState>,
    OptionalUser(requester): OptionalUser,
    Query(query): Query<FolderSearchQuery>,
) -> Result<Json<FolderListResponse>, ApiError> {
    let sort = match query.sort.as_deref().map(str::trim) {
        None | Some("") => FolderSort::default(),
        Some(raw) => raw.parse().map_err(ApiError::Validation)?,
    };

    let search = FolderSearch {
        keyword: query.keyword,
        creator: query.creator,
        page: PageRequest::from(query.page),
        sort,
    };

    let page = state
        .folder_service
        .search(search, requester.as_ref())
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_folder_handler(
    State(state): State<AppState>,
    OptionalUser(requester): OptionalUser,
    Path(folder_id): Path<String>,
) -> Result<Json<FolderDetailResponse>, ApiError> {
    let detail = state
        .folder_service
        .get(&folder_id, requester.as_ref())
        .await?;
    Ok(Json(detail.into()))
}

#[tracing::instrument(skip(state), fields(owner = %owner))]
pub async fn add_audio_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path((folder_id, audio_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    state
        .folder_service
        .add_audio(&owner, &folder_id, &audio_id)
        .await?;
    Ok((StatusCode::CREATED, Json(StatusResponse::ok())))
}

#[tracing::instrument(skip(state), fields(owner = %owner))]
pub async fn remove_audio_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path((folder_id, audio_id)): Path<(String, String)>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .folder_service
        .remove_audio(&owner, &folder_id, &audio_id)
        .await?;
    Ok(Json(StatusResponse::ok()))
}
