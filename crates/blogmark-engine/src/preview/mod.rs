//! Link previews.
//!
//! Links to a few well-known sites get a `data-provider` attribute and,
//! when a [`PreviewFetcher`] is wired in, a small preview card. Fetching
//! itself (HTTP, API keys, JSON) lives outside this crate; [`PreviewClient`]
//! only bounds each fetch with a timeout and a cancellation signal, and
//! turns every failure into "no preview".

mod card;
mod client;

use async_trait::async_trait;
use blogmark_config::ProviderToggles;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub use card::last_updated;
pub use client::{CancelHandle, PreviewClient};

/// Sites whose links are recognised, by URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    YouTube,
    GitHub,
    Reddit,
    GoPkg,
}

impl Provider {
    const PREFIXES: [(&'static str, Provider); 4] = [
        ("https://www.youtube.com", Provider::YouTube),
        ("https://github.com", Provider::GitHub),
        ("https://www.reddit.com", Provider::Reddit),
        ("https://pkg.go.dev", Provider::GoPkg),
    ];

    pub fn detect(url: &str) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix))
            .map(|(_, provider)| *provider)
    }

    /// Value of the `data-provider` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Provider::YouTube => "youtube",
            Provider::GitHub => "github",
            Provider::Reddit => "reddit",
            Provider::GoPkg => "gopkg",
        }
    }

    pub fn enabled_in(self, toggles: &ProviderToggles) -> bool {
        match self {
            Provider::YouTube => toggles.youtube,
            Provider::GitHub => toggles.github,
            Provider::Reddit => toggles.reddit,
            Provider::GoPkg => toggles.gopkg,
        }
    }
}

/// What to fetch for a link. Only some providers have previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRequest {
    Video { url: String, id: String },
    Repository { url: String, owner: String, repo: String },
}

impl PreviewRequest {
    /// Build a request from a link target; `None` for unsupported or malformed URLs.
    pub fn parse(raw: &str) -> Option<Self> {
        let provider = Provider::detect(raw)?;
        let url = Url::parse(raw).ok()?;

        match provider {
            Provider::YouTube => {
                let id = url
                    .query_pairs()
                    .find(|(key, _)| *key == "v")
                    .map(|(_, value)| value.into_owned())
                    .filter(|id| !id.is_empty())?;
                Some(Self::Video {
                    url: raw.to_string(),
                    id,
                })
            }
            Provider::GitHub => {
                let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
                let owner = segments.next()?.to_string();
                let repo = segments.next()?.to_string();
                Some(Self::Repository {
                    url: raw.to_string(),
                    owner,
                    repo,
                })
            }
            Provider::Reddit | Provider::GoPkg => None,
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Video { .. } => Provider::YouTube,
            Self::Repository { .. } => Provider::GitHub,
        }
    }
}

/// Data shown in a preview card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewCard {
    Video {
        url: String,
        title: String,
        channel_id: String,
        channel_title: String,
        thumbnail_url: String,
    },
    Repository {
        owner: String,
        repo: String,
        branches: Vec<String>,
        last_commit_message: String,
        /// Minutes since the latest commit.
        updated_minutes_ago: u64,
    },
}

#[derive(Debug, Error)]
pub enum PreviewFetchError {
    #[error("preview request failed: {0}")]
    Request(String),

    #[error("preview endpoint answered with status {0}")]
    Status(u16),

    #[error("preview response contained no items")]
    Empty,

    #[error("preview fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("preview fetch cancelled")]
    Cancelled,

    #[error("preview fetch skipped inside an async runtime")]
    InsideRuntime,
}

/// Fetches preview data from the provider's API.
#[async_trait]
pub trait PreviewFetcher: Send + Sync {
    async fn fetch(&self, request: &PreviewRequest) -> Result<PreviewCard, PreviewFetchError>;
}
