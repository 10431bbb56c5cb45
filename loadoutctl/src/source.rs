//! Where loadout text comes from: a local file or a paste service.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info};

use crate::error::{CtlError, CtlResult};

const PASTEBIN_HOST: &str = "pastebin.com";

/// A loadout text location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadoutSource {
    /// Local file
    File(PathBuf),
    /// Paste service URL
    Paste(String),
}

impl LoadoutSource {
    /// Read the loadout text.
    pub async fn fetch(&self, timeout: Duration) -> CtlResult<String> {
        match self {
            Self::File(path) => {
                debug!(path = %path.display(), "Reading loadout file");
                tokio::fs::read_to_string(path).await.map_err(|source| CtlError::Io {
                    path: path.clone(),
                    source,
                })
            },
            Self::Paste(url) => {
                let url = raw_paste_url(url)?;
                info!(%url, "Fetching loadout from paste service");

                let client = reqwest::Client::builder().timeout(timeout).build()?;
                let text = client.get(&url).send().await?.error_for_status()?.text().await?;
                Ok(text)
            },
        }
    }
}

impl fmt::Display for LoadoutSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Paste(url) => write!(f, "{}", url),
        }
    }
}

/// Rewrite a paste page URL to its raw-text endpoint.
///
/// `https://pastebin.com/<id>` becomes `https://pastebin.com/raw/<id>`.
/// Raw URLs and other hosts pass through unchanged.
pub fn raw_paste_url(url: &str) -> CtlResult<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| CtlError::Source(format!("Invalid URL {}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CtlError::Source(format!("Not an http(s) URL: {}", url)));
    }

    let host = parsed.host_str().unwrap_or_default();
    if host.strip_prefix("www.").unwrap_or(host) != PASTEBIN_HOST {
        return Ok(parsed.to_string());
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let id = match segments.as_slice() {
        ["raw", id] => *id,
        [id] if *id != "raw" => *id,
        _ => return Err(CtlError::Source(format!("Paste URL has no paste id: {}", url))),
    };

    Ok(format!("https://{}/raw/{}", PASTEBIN_HOST, id))
}

/// Let the user revise loadout text in their editor before it is resolved.
///
/// `editor` is split on whitespace into a program and leading arguments; the
/// temp file path is passed last.
pub async fn edit_text(text: &str, editor: &str) -> CtlResult<String> {
    let mut words = editor.split_whitespace();
    let program = words.next().ok_or_else(|| {
        CtlError::Config("No editor configured: set VISUAL or EDITOR".to_string())
    })?;

    let file = tempfile::Builder::new()
        .prefix("loadout-")
        .suffix(".txt")
        .tempfile()
        .map_err(|source| CtlError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
    let path = file.path().to_path_buf();
    let io_error = |source: std::io::Error| CtlError::Io {
        path: path.clone(),
        source,
    };

    tokio::fs::write(&path, text).await.map_err(io_error)?;

    debug!(editor, path = %path.display(), "Opening loadout in editor");
    let status = tokio::process::Command::new(program)
        .args(words)
        .arg(&path)
        .status()
        .await
        .map_err(io_error)?;
    if !status.success() {
        return Err(CtlError::Source(format!("Editor {} exited with {}", program, status)));
    }

    tokio::fs::read_to_string(&path).await.map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_rewritten_to_raw() {
        assert_eq!(
            raw_paste_url("https://pastebin.com/AbC123").unwrap(),
            "https://pastebin.com/raw/AbC123"
        );
        assert_eq!(
            raw_paste_url("http://www.pastebin.com/AbC123/").unwrap(),
            "https://pastebin.com/raw/AbC123"
        );
    }

    #[test]
    fn test_raw_url_unchanged() {
        assert_eq!(
            raw_paste_url("https://pastebin.com/raw/AbC123").unwrap(),
            "https://pastebin.com/raw/AbC123"
        );
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        assert_eq!(
            raw_paste_url("https://PasteBin.com/AbC123?lang=text#top").unwrap(),
            "https://pastebin.com/raw/AbC123"
        );
    }

    #[test]
    fn test_other_hosts_pass_through() {
        assert_eq!(
            raw_paste_url("https://example.org/loadouts/1.txt").unwrap(),
            "https://example.org/loadouts/1.txt"
        );
    }

    #[test]
    fn test_invalid_urls_rejected() {
        assert!(matches!(raw_paste_url("pastebin.com/AbC123"), Err(CtlError::Source(_))));
        assert!(matches!(raw_paste_url("https://pastebin.com/"), Err(CtlError::Source(_))));
        assert!(matches!(raw_paste_url("https://pastebin.com/raw/"), Err(CtlError::Source(_))));
        assert!(matches!(raw_paste_url("ftp://pastebin.com/AbC123"), Err(CtlError::Source(_))));
    }

    #[tokio::test]
    async fn test_file_source_reads_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loadout.txt");
        std::fs::write(&path, "EQUIP // 1:a").unwrap();

        let text = LoadoutSource::File(path).fetch(Duration::from_secs(1)).await.unwrap();

        assert_eq!(text, "EQUIP // 1:a");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = LoadoutSource::File(PathBuf::from("/nonexistent/loadout.txt"));

        let result = source.fetch(Duration::from_secs(1)).await;

        assert!(matches!(result, Err(CtlError::Io { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_text_returns_revised_text() {
        let edited = edit_text("EQUIP // 200:def\n", "sed -i s/200:def/100:abc/").await.unwrap();

        assert_eq!(edited, "EQUIP // 100:abc\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_editor_aborts() {
        let result = edit_text("EQUIP // 200:def\n", "false").await;

        assert!(matches!(result, Err(CtlError::Source(_))));
    }

    #[tokio::test]
    async fn test_blank_editor_is_config_error() {
        let result = edit_text("EQUIP // 200:def\n", "  ").await;

        assert!(matches!(result, Err(CtlError::Config(_))));
    }
}
