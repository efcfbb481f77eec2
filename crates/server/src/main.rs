use slipscan_server::config::ServerConfig;
use slipscan_server::{build_pipeline, serve, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    telemetry::init_tracing(config.log_format);

    let state = AppState::new(build_pipeline(&config));
    serve(&config, state).await
}
