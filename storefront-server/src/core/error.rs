use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Startup and serve-loop failures
///
/// Request-level failures use [`shared::AppError`] instead.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to prepare {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog initialization failed: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    #[error("placeholder image setup failed: {0}")]
    Placeholder(#[from] crate::media::MediaError),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
