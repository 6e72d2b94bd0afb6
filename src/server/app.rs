//! Server bootstrap and lifecycle

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::application::LocateTopicUseCase;
use crate::domain::config::AppConfig;
use crate::infrastructure::{GeminiOracle, XdgConfigStore, YtDlpDownloader};
use crate::server::router::create_router;
use crate::server::state::AppState;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Run the server until a shutdown signal arrives
pub async fn run_server(cli_config: AppConfig, config_path: Option<PathBuf>) -> ExitCode {
    let config = load_merged_config(cli_config, config_path).await;

    // Refuse to start without credentials rather than failing per request
    let api_key = match get_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Create adapters
    let downloader = YtDlpDownloader::new();
    let oracle = GeminiOracle::with_model(api_key, config.model_or_default());

    let state = AppState {
        locate: Arc::new(LocateTopicUseCase::new(downloader, oracle)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host_or_default(), config.port_or_default());
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind listen address");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    tracing::info!(addr = %addr, model = config.model_or_default(), "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Get the API key from the merged config
fn get_api_key(config: &AppConfig) -> Result<String, String> {
    config
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            "Missing API key. Set GEMINI_API_KEY or add api_key to the config file".to_string()
        })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig, config_path: Option<PathBuf>) -> AppConfig {
    let store = match config_path {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    };

    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %store.path().display(), error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Build env config
    let env_config = AppConfig {
        api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Resolve on ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
