use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{FolderRepository, RepositoryError};
use crate::domain::{
    AudioId, Folder, FolderId, FolderQuery, FolderSort, LikeToggle, Page, PageRequest, UserId,
};
use crate::infrastructure::persistence::{like_pattern, map_sqlx_error};

const FOLDER_COLUMNS: &str = "id, creator_id, name, like_count, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct FolderRow {
    id: Uuid,
    creator_id: String,
    name: String,
    like_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FolderRow> for Folder {
    fn from(r: FolderRow) -> Self {
        Folder {
            id: FolderId::from_uuid(r.id),
            creator_id: UserId::new(r.creator_id),
            name: r.name,
            like_count: r.like_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn sort_clause(sort: FolderSort) -> &'static str {
    match sort {
        FolderSort::DateLatest => "updated_at DESC, id ASC",
        FolderSort::DateLast => "updated_at ASC, id ASC",
        FolderSort::LikeAsc => "like_count ASC, updated_at DESC, id ASC",
        FolderSort::LikeDesc => "like_count DESC, updated_at DESC, id ASC",
    }
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a FolderQuery) {
    builder.push(" WHERE TRUE");
    if let Some(keyword) = &query.keyword {
        builder
            .push(" AND name ILIKE ")
            .push_bind(like_pattern(keyword))
            .push(r" ESCAPE '\'");
    }
    if let Some(creator) = &query.creator {
        builder.push(" AND creator_id = ").push_bind(creator.as_str());
    }
}

pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn touch(
        executor: impl sqlx::PgExecutor<'_>,
        id: FolderId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE folders SET updated_at = clock_timestamp() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(executor)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    #[instrument(skip(self), fields(creator = %creator))]
    async fn insert(&self, creator: &UserId, name: &str) -> Result<Folder, RepositoryError> {
        let row: FolderRow = sqlx::query_as(&format!(
            "INSERT INTO folders (creator_id, name) VALUES ($1, $2) RETURNING {FOLDER_COLUMNS}"
        ))
        .bind(creator.as_str())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(folder_id = %id))]
    async fn find_by_id(&self, id: FolderId) -> Result<Option<Folder>, RepositoryError> {
        let row: Option<FolderRow> =
            sqlx::query_as(&format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(Folder::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Folder>, RepositoryError> {
        let row: Option<FolderRow> =
            sqlx::query_as(&format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE name = $1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(Folder::from))
    }

    #[instrument(skip(self), fields(folder_id = %id))]
    async fn rename(&self, id: FolderId, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE folders SET name = $1, updated_at = clock_timestamp() WHERE id = $2",
        )
        .bind(name)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(folder_id = %id))]
    async fn delete(&self, id: FolderId) -> Result<bool, RepositoryError> {
        // Memberships and likes cascade through their foreign keys.
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(folder_id = %folder, audio_id = %audio))]
    async fn add_audio(&self, folder: FolderId, audio: AudioId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO folder_audio (folder_id, audio_id) VALUES ($1, $2)")
            .bind(folder.as_uuid())
            .bind(audio.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        Self::touch(&mut *tx, folder).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    #[instrument(skip(self), fields(folder_id = %folder, audio_id = %audio))]
    async fn remove_audio(
        &self,
        folder: FolderId,
        audio: AudioId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM folder_audio WHERE folder_id = $1 AND audio_id = $2")
            .bind(folder.as_uuid())
            .bind(audio.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        Self::touch(&mut *tx, folder).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }

    #[instrument(skip(self), fields(folder_id = %folder))]
    async fn membership(&self, folder: FolderId) -> Result<Vec<AudioId>, RepositoryError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT audio_id FROM folder_audio WHERE folder_id = $1 ORDER BY added_at, audio_id",
        )
        .bind(folder.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(ids.into_iter().map(AudioId::from_uuid).collect())
    }

    #[instrument(skip(self), fields(folder_id = %folder, user = %user))]
    async fn toggle_like(
        &self,
        folder: FolderId,
        user: &UserId,
    ) -> Result<LikeToggle, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let removed = sqlx::query("DELETE FROM folder_likes WHERE folder_id = $1 AND user_id = $2")
            .bind(folder.as_uuid())
            .bind(user.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        let (toggle, delta) = if removed > 0 {
            (LikeToggle::Unliked, -1_i64)
        } else {
            // A concurrent toggle may have inserted first; the conflict
            // leaves the row in place and the count untouched.
            let inserted = sqlx::query(
                "INSERT INTO folder_likes (folder_id, user_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(folder.as_uuid())
            .bind(user.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();
            (LikeToggle::Liked, if inserted > 0 { 1 } else { 0 })
        };

        if delta != 0 {
            sqlx::query("UPDATE folders SET like_count = like_count + $1 WHERE id = $2")
                .bind(delta)
                .bind(folder.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(toggle)
    }

    async fn is_liked(&self, folder: FolderId, user: &UserId) -> Result<bool, RepositoryError> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM folder_likes WHERE folder_id = $1 AND user_id = $2)",
        )
        .bind(folder.as_uuid())
        .bind(user.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(liked)
    }

    async fn liked_among(
        &self,
        user: &UserId,
        folders: &[FolderId],
    ) -> Result<HashSet<FolderId>, RepositoryError> {
        if folders.is_empty() {
            return Ok(HashSet::new());
        }
        let uuids: Vec<Uuid> = folders.iter().map(|id| id.as_uuid()).collect();

        let liked: Vec<Uuid> = sqlx::query_scalar(
            "SELECT folder_id FROM folder_likes WHERE user_id = $1 AND folder_id = ANY($2)",
        )
        .bind(user.as_str())
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(liked.into_iter().map(FolderId::from_uuid).collect())
    }

    #[instrument(skip(self, query), fields(sort = %query.sort, page = query.page.number()))]
    async fn search(&self, query: &FolderQuery) -> Result<Page<Folder>, RepositoryError> {
        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {FOLDER_COLUMNS} FROM folders"));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY ")
            .push(sort_clause(query.sort))
            .push(" LIMIT ")
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let rows: Vec<FolderRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM folders");
        push_filters(&mut count, query);
        let count: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Page::new(
            rows.into_iter().map(Folder::from).collect(),
            count,
            query.page,
        ))
    }

    #[instrument(skip(self), fields(user = %user, page = page.number()))]
    async fn liked_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Page<Folder>, RepositoryError> {
        let rows: Vec<FolderRow> = sqlx::query_as(
            r#"
            SELECT f.id, f.creator_id, f.name, f.like_count, f.created_at, f.updated_at
            FROM folder_likes l
            JOIN folders f ON f.id = l.folder_id
            WHERE l.user_id = $1
            ORDER BY l.liked_at DESC, f.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folder_likes WHERE user_id = $1")
            .bind(user.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Page::new(rows.into_iter().map(Folder::from).collect(), count, page))
    }
}
