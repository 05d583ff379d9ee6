//! Mirror-fallback download of measurement files with a local cache.

use argorag_core::config::IngestConfig;
use argorag_core::error::{ArgoragError, Result};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors surfaced while downloading from a single mirror.
#[derive(Debug, Error)]
enum DownloadError {
    #[error("status {0}")]
    Status(reqwest::StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Retrieves raw measurement files from an ordered list of archive
/// mirrors, caching them locally by base name.
pub struct MirrorFetcher {
    mirrors: Vec<String>,
    cache_dir: PathBuf,
    client: reqwest::Client,
}

impl MirrorFetcher {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| ArgoragError::ConfigInvalid {
                key: "fetch_timeout".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            mirrors: config.mirrors.clone(),
            cache_dir: config.cache_dir.clone(),
            client,
        })
    }

    /// Return a local path to the file's content, downloading it from the
    /// first mirror that serves it. A cached copy short-circuits the
    /// network entirely.
    pub async fn fetch(&self, file: &str) -> Result<PathBuf> {
        let name = base_name(file);
        let local_path = self.cache_dir.join(name);

        if tokio::fs::try_exists(&local_path).await? {
            tracing::debug!(file, path = %local_path.display(), "cache hit");
            return Ok(local_path);
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        for mirror in &self.mirrors {
            let url = format!("{}/{}", mirror.trim_end_matches('/'), file);
            match self.download(&url, &local_path).await {
                Ok(()) => {
                    tracing::info!(file, %mirror, "downloaded");
                    return Ok(local_path);
                }
                Err(error) => {
                    tracing::warn!(file, %mirror, %error, "mirror failed");
                }
            }
        }

        Err(ArgoragError::Fetch {
            file: file.to_string(),
            mirrors_tried: self.mirrors.len(),
        })
    }

    /// Stream one URL into the cache. The body lands in a `.part` file
    /// that is renamed into place only after the stream completes, so an
    /// interrupted download never satisfies a later cache check.
    async fn download(&self, url: &str, dest: &Path) -> std::result::Result<(), DownloadError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }

        let part_path = dest.with_file_name(format!(
            "{}.part",
            dest.file_name().and_then(|n| n.to_str()).unwrap_or("download")
        ));

        let result = write_stream(response, &part_path).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&part_path).await;
            return result;
        }

        tokio::fs::rename(&part_path, dest).await?;
        Ok(())
    }
}

async fn write_stream(
    response: reqwest::Response,
    part_path: &Path,
) -> std::result::Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(part_path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }

    file.flush().await?;
    Ok(())
}

/// Last path segment of a file reference, used as the cache key.
fn base_name(file: &str) -> &str {
    file.rsplit('/').next().unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("aoml/4902911/profiles/R4902911_001.nc"), "R4902911_001.nc");
        assert_eq!(base_name("R4902911_001.nc"), "R4902911_001.nc");
    }
}
