use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{DashError, Result};

/// Where the raw CSV bytes come from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short description used in logs and error messages.
    fn describe(&self) -> String;

    /// Read the whole resource into memory.
    async fn read(&self) -> Result<Vec<u8>>;
}

/// Remote CSV fetched over HTTP(S).
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        info!(url = %self.url, "fetching dataset");
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let response = client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashError::FetchError(format!(
                "{} responded with {}",
                self.url, status
            )));
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "dataset downloaded");
        Ok(body.to_vec())
    }
}

/// CSV on the local file system.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        info!(path = %self.path.display(), "reading dataset");
        tokio::fs::read(&self.path).await.map_err(|e| {
            DashError::FetchError(format!("cannot read {}: {}", self.path.display(), e))
        })
    }
}

/// Pick a source implementation from the location's scheme.
pub fn source_for(location: &str, timeout: Duration) -> Box<dyn DataSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location, timeout))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Box::new(FileSource::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;
    use std::io::Write;

    /// Serve a small CSV on an ephemeral local port and return the base URL.
    async fn spawn_csv_server() -> String {
        let app = Router::new().route("/owid.csv", get(|| async { "a,b\n1,2\n" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_source_for_picks_by_scheme() {
        let timeout = Duration::from_secs(1);
        assert_eq!(
            source_for("https://example.org/data.csv", timeout).describe(),
            "https://example.org/data.csv"
        );
        assert_eq!(
            source_for("file:///tmp/data.csv", timeout).describe(),
            "/tmp/data.csv"
        );
        assert_eq!(source_for("data.csv", timeout).describe(), "data.csv");
    }

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,2\n").unwrap();

        let source = FileSource::new(file.path());
        let bytes = source.read().await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let source = FileSource::new("/definitely/not/here.csv");
        let err = source.read().await.unwrap_err();
        assert!(matches!(err, DashError::FetchError(_)));
    }

    #[tokio::test]
    async fn test_http_source_reads_body() {
        let base = spawn_csv_server().await;
        let source = source_for(&format!("{base}/owid.csv"), Duration::from_secs(5));

        let bytes = source.read().await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_http_error_status_is_fetch_error() {
        let base = spawn_csv_server().await;
        let source = HttpSource::new(&format!("{base}/missing.csv"), Duration::from_secs(5));

        match source.read().await.unwrap_err() {
            DashError::FetchError(message) => assert!(message.contains("404")),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
