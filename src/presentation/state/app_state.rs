use std::sync::Arc;

use crate::application::ports::TokenVerifier;
use crate::application::services::{AudioService, FolderService};

#[derive(Clone)]
pub struct AppState {
    pub audio_service: Arc<AudioService>,
    pub folder_service: Arc<FolderService>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// Whether `cf-connecting-ip` and `x-forwarded-for` identify the client.
    pub trust_proxy_headers: bool,
}
