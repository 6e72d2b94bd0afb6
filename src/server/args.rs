//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::Parser;

use crate::domain::AppConfig;

/// TopicSeek - find when a topic is spoken in a video
#[derive(Parser, Debug)]
#[command(name = "topic-seek")]
#[command(version)]
#[command(about = "HTTP service that finds when a topic is spoken in a video using Google Gemini")]
#[command(long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, value_name = "HOST", env = "TOPIC_SEEK_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, value_name = "PORT", env = "TOPIC_SEEK_PORT")]
    pub port: Option<u16>,

    /// Gemini model to query
    #[arg(short = 'm', long, value_name = "MODEL", env = "TOPIC_SEEK_MODEL")]
    pub model: Option<String>,

    /// Config file path (defaults to the XDG location)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Convert parsed arguments into a partial config for merging.
    /// The API key is never taken from the command line.
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            api_key: None,
            model: self.model.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}
