use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{AudioDownloader, DownloadError, TimestampOracle};
use crate::application::{LocateTopicError, LocateTopicInput};
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct AskRequest {
    pub video_url: String,
    pub topic: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub timestamp: String,
    pub video_url: String,
    pub topic: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn ask_handler<D, O>(
    State(state): State<AppState<D, O>>,
    Json(request): Json<AskRequest>,
) -> impl IntoResponse
where
    D: AudioDownloader + 'static,
    O: TimestampOracle + 'static,
{
    tracing::debug!(video_url = %request.video_url, topic = %request.topic, "Processing ask");

    let input = LocateTopicInput {
        video_url: request.video_url,
        topic: request.topic,
    };

    match state.locate.execute(input).await {
        Ok(output) => {
            tracing::info!(timestamp = %output.timestamp, "Topic located");
            (
                StatusCode::OK,
                Json(AskResponse {
                    timestamp: output.timestamp.into_string(),
                    video_url: output.video_url,
                    topic: output.topic,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Ask failed");
            (error_status(&e), Json(ErrorResponse { error: e.to_string() })).into_response()
        }
    }
}

/// A rejected download is the caller's fault, everything else is ours
fn error_status(error: &LocateTopicError) -> StatusCode {
    match error {
        LocateTopicError::Download(DownloadError::ProcessFailed(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
