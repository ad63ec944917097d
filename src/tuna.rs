use std::path::Path;

use tokio::sync::RwLock;
use tracing::info;

use crate::constants::{SOUND_FILE_SUFFIX, TUNA_CDN_PREFIX, TUNA_SEARCH_URL, TUNA_TOKEN_URL};

/// Session for the Tuna sound catalog
///
/// Searches work unauthenticated; an access token obtained through
/// /tunacode is attached as a bearer token when present.
pub struct TunaClient {
    http: reqwest::Client,
    token: RwLock<Option<String>>,
}

/// Errors raised by the Tuna client
#[derive(Debug)]
pub enum TunaError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    MissingAccessToken,
    Io(std::io::Error),
}

impl std::fmt::Display for TunaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TunaError::Http(e) => write!(f, "request to Tuna failed: {}", e),
            TunaError::Status(code) => write!(f, "Tuna answered with status {}", code),
            TunaError::MissingAccessToken => {
                write!(f, "Tuna token response carried no access_token")
            }
            TunaError::Io(e) => write!(f, "failed to store downloaded sound: {}", e),
        }
    }
}

impl std::error::Error for TunaError {}

impl From<reqwest::Error> for TunaError {
    fn from(e: reqwest::Error) -> Self {
        TunaError::Http(e)
    }
}

impl From<std::io::Error> for TunaError {
    fn from(e: std::io::Error) -> Self {
        TunaError::Io(e)
    }
}

impl TunaClient {
    /// Create a client, optionally seeded with a token from the environment
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: RwLock::new(token),
        }
    }

    /// Exchange an authorization code for an access token and store it
    pub async fn authenticate(&self, code: &str) -> Result<(), TunaError> {
        let response = self
            .http
            .post(TUNA_TOKEN_URL)
            .form(&[("code", code)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TunaError::Status(response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        let token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or(TunaError::MissingAccessToken)?;

        *self.token.write().await = Some(token.to_string());
        info!("Authenticated with Tuna");
        Ok(())
    }

    /// Search the catalog and return the direct media URLs found in the
    /// response body
    pub async fn search(&self, query: &str) -> Result<Vec<String>, TunaError> {
        let url = format!("{}?search={}", TUNA_SEARCH_URL, query.replace(' ', "+"));

        let mut request = self.http.get(url);
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TunaError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(extract_sound_urls(&body))
    }

    /// Download a clip to the given path, creating parent directories
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), TunaError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(TunaError::Status(response.status()));
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

/// Scan a search response body for direct media links
///
/// Tuna returns an HTML page rather than a structured listing, so links
/// are located by the CDN host prefix and the `.mp3` suffix. A format
/// change on the remote side yields an empty list, not an error.
pub fn extract_sound_urls(body: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = body;

    while let Some(start) = rest.find(TUNA_CDN_PREFIX) {
        let tail = &rest[start..];
        let Some(end) = tail.find(SOUND_FILE_SUFFIX) else {
            break;
        };
        let end = end + SOUND_FILE_SUFFIX.len();
        urls.push(tail[..end].to_string());
        rest = &tail[end..];
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_every_link() {
        let body = format!(
            "<li><a href=\"{p}abc{s}\">one</a></li><li>{p}def-123{s}</li>",
            p = TUNA_CDN_PREFIX,
            s = SOUND_FILE_SUFFIX,
        );

        let urls = extract_sound_urls(&body);
        assert_eq!(
            urls,
            vec![
                format!("{}abc.mp3", TUNA_CDN_PREFIX),
                format!("{}def-123.mp3", TUNA_CDN_PREFIX),
            ]
        );
    }

    #[test]
    fn test_unrelated_body_yields_nothing() {
        assert!(extract_sound_urls("<html><body>no sounds here</body></html>").is_empty());
        assert!(extract_sound_urls("").is_empty());
    }

    #[test]
    fn test_prefix_without_suffix_is_ignored() {
        let body = format!("{}truncated-link-without-extension", TUNA_CDN_PREFIX);
        assert!(extract_sound_urls(&body).is_empty());
    }

    #[test]
    fn test_suffix_before_prefix_is_not_matched() {
        let body = format!("something.mp3 then {}real{}", TUNA_CDN_PREFIX, SOUND_FILE_SUFFIX);
        assert_eq!(
            extract_sound_urls(&body),
            vec![format!("{}real.mp3", TUNA_CDN_PREFIX)]
        );
    }
}
