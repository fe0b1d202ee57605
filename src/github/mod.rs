use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::str::FromStr;

use crate::config::DEFAULT_API_URL;
use crate::http::HttpClient;

mod types;

pub use types::{Release, ReleaseAsset};

/// Read-only access to a repository's releases.
#[cfg_attr(test, mockall::automock)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait GetReleases {
    /// `GET /repos/{owner}/{repo}/releases/latest`
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release>;
    /// `GET /repos/{owner}/{repo}/releases`, newest first.
    async fn get_releases(&self, repo: &GitHubRepo) -> Result<Vec<Release>>;
}

pub struct GitHub {
    http: HttpClient,
    api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: Client, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http: HttpClient::new(client),
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn releases_url(&self, repo: &GitHubRepo) -> String {
        format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.repo)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl GetReleases for GitHub {
    #[tracing::instrument(skip(self))]
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release> {
        let url = format!("{}/latest", self.releases_url(repo));
        self.http
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch latest release of {}", repo))
    }

    #[tracing::instrument(skip(self))]
    async fn get_releases(&self, repo: &GitHubRepo) -> Result<Vec<Release>> {
        let url = self.releases_url(repo);
        self.http
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch releases of {}", repo))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(GitHubRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}
