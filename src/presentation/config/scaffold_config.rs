/// Scaffold mode serves the HTTP surface from in-process fakes: in-memory
/// records, object store and cache, and a transcoder that reports a fixed
/// duration.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub mock_duration_secs: f64,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("SCAFFOLD_MODE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            mock_duration_secs: std::env::var("MOCK_DURATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(42.0),
        }
    }
}
