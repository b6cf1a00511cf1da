/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body, sized for artifact bundle uploads
    /// (default: 1 GiB).
    pub max_body_bytes: usize,
    /// Per-job output buffer bound, in chunks (default: `10000`).
    pub output_buffer_chunks: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default      |
    /// |-------------------------|--------------|
    /// | `HOST`                  | `0.0.0.0`    |
    /// | `PORT`                  | `8000`       |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`         |
    /// | `MAX_BODY_BYTES`        | `1073741824` |
    /// | `OUTPUT_BUFFER_CHUNKS`  | `10000`      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| "1073741824".into())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let output_buffer_chunks: i64 = std::env::var("OUTPUT_BUFFER_CHUNKS")
            .unwrap_or_else(|_| benchline_db::repositories::output_repo::MAX_BUFFERED_CHUNKS.to_string())
            .parse()
            .expect("OUTPUT_BUFFER_CHUNKS must be a valid i64");

        Self {
            host,
            port,
            request_timeout_secs,
            max_body_bytes,
            output_buffer_chunks,
        }
    }
}
