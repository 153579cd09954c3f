mod pg_pool;
mod repositories;

pub use pg_pool::{create_pool, run_migrations};
pub(crate) use pg_pool::{like_pattern, map_sqlx_error};

pub use repositories::{InMemoryStore, PgAudioRepository, PgFolderRepository};
