use anyhow::{Context, Result};
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub payload: EventPayload,
}

/// Only push-style events carry commits; everything else deserializes to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub commits: Vec<EventCommit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCommit {
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated GitHub REST client. One instance (and one connection pool)
/// is shared across every request in a run.
pub struct GitHub {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GitHub {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_BASE.to_string())
    }

    /// Point the client at a different API base. Used by tests.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("glean/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            token,
            base_url,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API returned {status}: {body}");
        }

        Ok(resp)
    }

    /// List a user's public repositories. First page only; accounts with more
    /// repos than one page returns are only partially covered.
    pub async fn user_repos(&self, username: &str) -> Result<Vec<Repo>> {
        let url = format!("{}/users/{username}/repos", self.base_url);
        self.get(&url)
            .await?
            .json()
            .await
            .context("parsing repository list")
    }

    /// List a user's recent public events. First page only.
    pub async fn user_events(&self, username: &str) -> Result<Vec<Event>> {
        let url = format!("{}/users/{username}/events/public", self.base_url);
        self.get(&url)
            .await?
            .json()
            .await
            .context("parsing event list")
    }

    pub async fn repo_commits(&self, owner: &str, repo: &str) -> Result<Vec<Commit>> {
        let url = format!("{}/repos/{owner}/{repo}/commits", self.base_url);
        self.get(&url)
            .await?
            .json()
            .await
            .context("parsing commit list")
    }

    /// Fetch the raw patch text for a commit. The `.patch` suffix asks GitHub
    /// for the diff representation instead of the JSON one.
    pub async fn commit_patch(&self, html_url: &str) -> Result<String> {
        let url = format!("{html_url}.patch");
        self.get(&url)
            .await?
            .text()
            .await
            .context("reading patch body")
    }
}
