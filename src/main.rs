//! TopicSeek server entry point

use std::process::ExitCode;

use clap::Parser;

use topic_seek::infrastructure::observability::{init_tracing, TracingConfig};
use topic_seek::server::{app::run_server, args::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(TracingConfig::default());

    let config_path = cli.config.clone();
    run_server(cli.to_config(), config_path).await
}
