//! Observability infrastructure module

mod init_tracing;
mod request_id;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use tracing_config::TracingConfig;
