//! Audio download infrastructure module

mod ytdlp;

pub use ytdlp::YtDlpDownloader;
