use std::path::{Path, PathBuf};

use tracing::info;

use crate::{backend::BackendApi, error::ClientError};

const FALLBACK_NAME: &str = "download";

/// Outcome of a batch download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadTally {
    pub succeeded: usize,
    pub failed: usize,
}

impl DownloadTally {
    pub fn record<T, E>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Keeps only the final path component so a backend-supplied name cannot
/// escape the download directory.
pub(crate) fn safe_filename(name: &str) -> String {
    let candidate = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        FALLBACK_NAME.to_string()
    } else {
        candidate.to_string()
    }
}

/// Fetches `url` and writes it under `dir`.
pub(crate) async fn save_asset(
    backend: &dyn BackendApi,
    dir: &Path,
    url: &str,
    filename: &str,
) -> Result<PathBuf, ClientError> {
    let bytes = backend.fetch_bytes(url).await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(safe_filename(filename));
    tokio::fs::write(&path, &bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "asset saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_flattened() {
        assert_eq!(safe_filename("image_1.png"), "image_1.png");
        assert_eq!(safe_filename("../../etc/passwd"), "passwd");
        assert_eq!(safe_filename("C:\\tmp\\clip.mp4"), "clip.mp4");
        assert_eq!(safe_filename("static/generated/"), FALLBACK_NAME);
        assert_eq!(safe_filename(".."), FALLBACK_NAME);
    }
}
