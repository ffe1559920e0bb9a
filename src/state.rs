use crate::config::AppConfig;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let http = reqwest::Client::builder()
            .user_agent(concat!("calwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_parts(config: Arc<AppConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }
}
