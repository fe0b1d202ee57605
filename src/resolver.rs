//! Binds the two download buttons to the newest stable and pre-release assets.

use anyhow::Result;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fmt;

use crate::config::DISABLED_CLASS;
use crate::github::{GetReleases, GitHubRepo};
use crate::http::{FetchError, classify_error};
use crate::page::{Element, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Latest published release, bound to `#release`.
    Stable,
    /// Newest pre-release, bound to `#nightly`.
    Nightly,
}

impl Channel {
    pub fn button(self) -> Element {
        match self {
            Channel::Stable => Element::ReleaseButton,
            Channel::Nightly => Element::NightlyButton,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => write!(f, "stable"),
            Channel::Nightly => write!(f, "nightly"),
        }
    }
}

/// Why a button ends up disabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Unavailable {
    /// Network error, non-OK status, or a body that is not JSON.
    FetchFailed(String),
    /// JSON that does not look like a release payload.
    Malformed(String),
    /// The release list holds no pre-release.
    NoRelease,
    /// The release has no asset with a download URL.
    NoAsset,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            Unavailable::Malformed(msg) => write!(f, "malformed response: {}", msg),
            Unavailable::NoRelease => write!(f, "no matching release"),
            Unavailable::NoAsset => write!(f, "release has no downloadable asset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LinkOutcome {
    Ready { url: String },
    Disabled { cause: Unavailable },
}

impl LinkOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            LinkOutcome::Ready { url } => Some(url),
            LinkOutcome::Disabled { .. } => None,
        }
    }

    fn disabled(cause: Unavailable) -> Self {
        LinkOutcome::Disabled { cause }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOutcome::Ready { url } => write!(f, "{}", url),
            LinkOutcome::Disabled { cause } => write!(f, "disabled ({})", cause),
        }
    }
}

fn from_error(err: &anyhow::Error) -> Unavailable {
    match classify_error(err) {
        Some(FetchError::Shape(msg)) => Unavailable::Malformed(msg.clone()),
        _ => Unavailable::FetchFailed(format!("{:#}", err)),
    }
}

/// Looks up the download URL for a channel. Never fails: every problem
/// becomes a [`LinkOutcome::Disabled`].
#[tracing::instrument(skip(releases))]
pub async fn resolve(
    channel: Channel,
    releases: &dyn GetReleases,
    repo: &GitHubRepo,
) -> LinkOutcome {
    let release = match channel {
        Channel::Stable => releases.get_latest_release(repo).await.map(Some),
        Channel::Nightly => releases
            .get_releases(repo)
            .await
            .map(|list| list.into_iter().find(|release| release.prerelease)),
    };

    match release {
        Ok(Some(release)) => {
            debug!("{}: using release {}", channel, release.tag_name);
            match release.download_url() {
                Some(url) => LinkOutcome::Ready {
                    url: url.to_string(),
                },
                None => LinkOutcome::disabled(Unavailable::NoAsset),
            }
        }
        Ok(None) => LinkOutcome::disabled(Unavailable::NoRelease),
        Err(err) => {
            error!("Error fetching JSON: {:#}", err);
            LinkOutcome::disabled(from_error(&err))
        }
    }
}

/// Writes an outcome to the channel's button: `href` when ready, the
/// disabled class otherwise.
pub fn apply(channel: Channel, outcome: &LinkOutcome, page: &dyn Page) -> Result<()> {
    let button = channel.button();
    match outcome {
        LinkOutcome::Ready { url } => {
            info!("{} download: {}", channel, url);
            page.set_attribute(button, "href", url)
        }
        LinkOutcome::Disabled { cause } => {
            warn!("{} download disabled: {}", channel, cause);
            page.add_class(button, DISABLED_CLASS)
        }
    }
}

/// Resolves a channel and applies the result to the page.
pub async fn bind(
    channel: Channel,
    releases: &dyn GetReleases,
    repo: &GitHubRepo,
    page: &dyn Page,
) -> LinkOutcome {
    let outcome = resolve(channel, releases, repo).await;
    if let Err(err) = apply(channel, &outcome, page) {
        error!("Failed to update {} button: {:#}", channel, err);
    }
    outcome
}
