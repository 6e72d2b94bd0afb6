//! Shared server state

use std::sync::Arc;

use crate::application::ports::{AudioDownloader, TimestampOracle};
use crate::application::LocateTopicUseCase;

pub struct AppState<D, O>
where
    D: AudioDownloader,
    O: TimestampOracle,
{
    pub locate: Arc<LocateTopicUseCase<D, O>>,
}

impl<D, O> Clone for AppState<D, O>
where
    D: AudioDownloader,
    O: TimestampOracle,
{
    fn clone(&self) -> Self {
        Self {
            locate: Arc::clone(&self.locate),
        }
    }
}
