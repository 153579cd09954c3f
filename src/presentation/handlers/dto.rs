use serde::{Deserialize, Serialize};

use crate::domain::{AudioRecord, Folder, FolderDetail, FolderSummary, Page};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioResponse {
    pub id: String,
    pub owner_id: String,
    pub url: String,
    pub title: String,
    pub filter: String,
    pub view_count: i64,
    pub duration_seconds: f64,
}

impl From<AudioRecord> for AudioResponse {
    fn from(audio: AudioRecord) -> Self {
        Self {
            id: audio.id.to_string(),
            owner_id: audio.owner_id.to_string(),
            url: audio.url,
            title: audio.title,
            filter: audio.filter.to_string(),
            view_count: audio.view_count,
            duration_seconds: audio.duration_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AudioListResponse {
    pub count: i64,
    pub data: Vec<AudioResponse>,
}

impl From<Page<AudioRecord>> for AudioListResponse {
    fn from(page: Page<AudioRecord>) -> Self {
        Self {
            count: page.count,
            data: page.items.into_iter().map(AudioResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: String,
    pub creator_id: String,
    pub folder_name: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_status: Option<bool>,
}

impl FolderResponse {
    fn new(folder: Folder, like_status: Option<bool>) -> Self {
        Self {
            id: folder.id.to_string(),
            creator_id: folder.creator_id.to_string(),
            folder_name: folder.name,
            like_count: folder.like_count,
            created_at: folder.created_at.to_rfc3339(),
            updated_at: folder.updated_at.to_rfc3339(),
            like_status,
        }
    }
}

impl From<FolderSummary> for FolderResponse {
    fn from(summary: FolderSummary) -> Self {
        Self::new(summary.folder, summary.like_status)
    }
}

#[derive(Debug, Serialize)]
pub struct FolderDetailResponse {
    #[serde(flatten)]
    pub folder: FolderResponse,
    pub audio: Vec<AudioResponse>,
}

impl From<FolderDetail> for FolderDetailResponse {
    fn from(detail: FolderDetail) -> Self {
        Self {
            folder: FolderResponse::new(detail.folder, detail.like_status),
            audio: detail.audio.into_iter().map(AudioResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub count: i64,
    pub page: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListResponse {
    pub data: Vec<FolderResponse>,
    pub page_info: PageInfo,
}

impl From<Page<FolderSummary>> for FolderListResponse {
    fn from(page: Page<FolderSummary>) -> Self {
        Self {
            page_info: PageInfo {
                count: page.count,
                page: page.page,
            },
            data: page.items.into_iter().map(FolderResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCreatedResponse {
    pub status: &'static str,
    pub folder_id: String,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub status: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUploadRequest {
    pub youtube_link: String,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNameRequest {
    pub folder_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AudioSearchQuery {
    pub page: Option<i64>,
    pub keyword: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AudioListQuery {
    pub page: Option<i64>,
    pub order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FolderSearchQuery {
    pub page: Option<i64>,
    pub keyword: Option<String>,
    pub creator: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}
