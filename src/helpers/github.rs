use crate::configuration::GithubSettings;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use serde_derive::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "2022-11-28";
const USER_AGENT: &str = "showcase-editor/0.3";

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("github commit target is not configured")]
    NotConfigured,
    #[error("github request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("github rejected the commit ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ContentsBody {
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Thin client for the GitHub contents API: fetch the current revision
/// marker of a path, and create-or-update a file against it. The core only
/// shapes payloads and interprets success/failure here.
#[derive(Debug, Clone)]
pub struct GithubClient {
    settings: GithubSettings,
    client: reqwest::Client,
}

impl GithubClient {
    pub fn new(settings: &GithubSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(GithubClient {
            settings: settings.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.repo,
            path
        )
    }

    /// Current revision marker (blob sha) for a remote path, None when the
    /// file does not exist yet.
    pub async fn file_sha(&self, path: &str) -> Result<Option<String>, CommitError> {
        if !self.is_configured() {
            return Err(CommitError::NotConfigured);
        }
        let url = format!("{}?ref={}", self.contents_url(path), self.settings.branch);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.settings.token)
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION_HEADER)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;
        if response.status().is_success() {
            let body: ContentsBody = response.json().await?;
            Ok(body.sha)
        } else {
            Ok(None)
        }
    }

    /// Create-or-update `path` on the configured branch. Returns the HTTP
    /// status code on success (200 update, 201 create).
    pub async fn upsert_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<u16, CommitError> {
        if !self.is_configured() {
            return Err(CommitError::NotConfigured);
        }
        let sha = self.file_sha(path).await?;
        let mut payload = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": self.settings.branch,
        });
        if let Some(sha) = sha {
            payload["sha"] = serde_json::Value::String(sha);
        }
        let response = self
            .client
            .put(self.contents_url(path))
            .bearer_auth(&self.settings.token)
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION_HEADER)
            .header("User-Agent", USER_AGENT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            Ok(status.as_u16())
        } else {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_default();
            Err(CommitError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}
