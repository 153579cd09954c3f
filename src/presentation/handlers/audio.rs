use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;

use crate::application::services::{FileUpload, LinkUpload};
use crate::domain::{AudioOrder, PageRequest};
use crate::presentation::state::AppState;

use super::dto::{
    AudioListQuery, AudioListResponse, AudioResponse, AudioSearchQuery, LinkUploadRequest,
    StatusResponse,
};
use super::error::ApiError;
use super::extract::{AuthUser, ClientIp};

/// `POST /v1/audio/file`: multipart with `file`, `name` and `filter`.
#[tracing::instrument(skip(state, multipart), fields(owner = %owner))]
pub async fn upload_file_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AudioResponse>), ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut name = String::new();
    let mut filter = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, data.to_vec()));
            }
            "name" => name = read_text(field).await?,
            "filter" => filter = read_text(field).await?,
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| ApiError::Validation("file is required".to_string()))?;

    let audio = state
        .audio_service
        .upload_by_file(
            &owner,
            FileUpload {
                file_name,
                data,
                name,
                filter,
            },
        )
        .await?;

    tracing::info!(audio_id = %audio.id, "Audio uploaded from file");
    Ok((StatusCode::CREATED, Json(audio.into())))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read field: {}", e)))
}

/// `POST /v1/audio/link`
#[tracing::instrument(skip(state, request), fields(owner = %owner))]
pub async fn upload_link_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Json(request): Json<LinkUploadRequest>,
) -> Result<(StatusCode, Json<AudioResponse>), ApiError> {
    let audio = state
        .audio_service
        .upload_by_link(
            &owner,
            LinkUpload {
                youtube_link: request.youtube_link,
                filter: request.filter.unwrap_or_default(),
                name: request.name,
            },
        )
        .await?;

    tracing::info!(audio_id = %audio.id, "Audio uploaded from link");
    Ok((StatusCode::CREATED, Json(audio.into())))
}

pub async fn search_audio_handler(
    State(state): State<AppState>,
    Query(query): Query<AudioSearchQuery>,
) -> Result<Json<AudioListResponse>, ApiError> {
    let page = state
        .audio_service
        .search(
            PageRequest::from(query.page),
            query.keyword.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(page.into()))
}

/// `GET /v1/audio/main?page&order`
pub async fn list_audio_handler(
    State(state): State<AppState>,
    Query(query): Query<AudioListQuery>,
) -> Result<Json<AudioListResponse>, ApiError> {
    let order = match query.order.as_deref().map(str::trim) {
        None | Some("") => AudioOrder::default(),
        Some(raw) => raw.parse().map_err(ApiError::Validation)?,
    };

    let page = state
        .audio_service
        .list(PageRequest::from(query.page), order)
        .await?;
    Ok(Json(page.into()))
}

pub async fn random_audio_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AudioResponse>>, ApiError> {
    let audio = state.audio_service.random().await?;
    Ok(Json(audio.into_iter().map(AudioResponse::from).collect()))
}

pub async fn my_audio_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
) -> Result<Json<Vec<AudioResponse>>, ApiError> {
    let audio = state.audio_service.list_by_owner(&owner).await?;
    Ok(Json(audio.into_iter().map(AudioResponse::from).collect()))
}

/// `GET /v1/audio/{id}`. Counts a view for the calling client.
pub async fn get_audio_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(audio_id): Path<String>,
) -> Result<Json<AudioResponse>, ApiError> {
    let audio = state.audio_service.get_by_id(&audio_id, &ip).await?;
    Ok(Json(audio.into()))
}

#[tracing::instrument(skip(state), fields(owner = %owner))]
pub async fn delete_audio_handler(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(audio_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.audio_service.delete(&owner, &audio_id).await?;
    Ok(Json(StatusResponse::ok()))
}
