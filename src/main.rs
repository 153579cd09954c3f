use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use tunefold::application::ports::{
    AudioObjectStore, AudioRepository, FolderRepository, Transcoder,
};
use tunefold::application::services::{AudioService, FolderService};
use tunefold::infrastructure::auth::SharedSecretVerifier;
use tunefold::infrastructure::cache::InMemoryCache;
use tunefold::infrastructure::observability::{TracingConfig, init_tracing};
use tunefold::infrastructure::persistence::{
    InMemoryStore, PgAudioRepository, PgFolderRepository, create_pool, run_migrations,
};
use tunefold::infrastructure::storage::{AudioStoreFactory, BlobAudioStore};
use tunefold::infrastructure::transcoding::{FfmpegTranscoder, MockTranscoder};
use tunefold::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

struct Adapters {
    audio_repository: Arc<dyn AudioRepository>,
    folder_repository: Arc<dyn FolderRepository>,
    transcoder: Arc<dyn Transcoder>,
    object_store: Arc<dyn AudioObjectStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment));

    let scaffold = ScaffoldConfig::default();
    let adapters = if scaffold.enabled {
        tracing::warn!("Scaffold mode enabled, using in-memory adapters");
        scaffold_adapters(&settings, &scaffold)
    } else {
        production_adapters(&settings).await?
    };

    let view_cache = InMemoryCache::new();
    spawn_cache_purge(view_cache.clone());

    let audio_service = Arc::new(AudioService::new(
        Arc::clone(&adapters.audio_repository),
        adapters.transcoder,
        adapters.object_store,
        Arc::new(view_cache),
        settings.views.window(),
    ));
    let folder_service = Arc::new(FolderService::new(
        adapters.folder_repository,
        adapters.audio_repository,
    ));

    let state = AppState {
        audio_service,
        folder_service,
        token_verifier: Arc::new(SharedSecretVerifier::new(&settings.auth.token_secret)),
        trust_proxy_headers: settings.server.trust_proxy_headers,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn production_adapters(settings: &Settings) -> anyhow::Result<Adapters> {
    let pool = create_pool(&settings.database.url, settings.database.max_connections)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!("Running database migrations");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let transcoder =
        FfmpegTranscoder::new(&settings.transcoder).context("Failed to set up transcoder")?;
    let object_store =
        AudioStoreFactory::create(&settings.storage).context("Failed to set up object store")?;

    Ok(Adapters {
        audio_repository: Arc::new(PgAudioRepository::new(pool.clone())),
        folder_repository: Arc::new(PgFolderRepository::new(pool)),
        transcoder: Arc::new(transcoder),
        object_store,
    })
}

fn scaffold_adapters(settings: &Settings, scaffold: &ScaffoldConfig) -> Adapters {
    let store = Arc::new(InMemoryStore::new());
    Adapters {
        audio_repository: store.clone(),
        folder_repository: store,
        transcoder: Arc::new(MockTranscoder::new(
            &settings.transcoder.scratch_dir,
            scaffold.mock_duration_secs,
            settings.transcoder.max_duration_secs,
        )),
        object_store: Arc::new(BlobAudioStore::in_memory(
            &settings.storage.public_base_url,
            &settings.storage.bucket,
        )),
    }
}

fn spawn_cache_purge(cache: InMemoryCache) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = cache.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired view markers");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
