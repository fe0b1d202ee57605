pub mod config;
pub mod device;
pub mod github;
pub mod http;
pub mod landing;
pub mod page;
pub mod resolver;
pub mod timer;

#[cfg(target_arch = "wasm32")]
mod browser;

/// Test fixtures shared across modules.
#[cfg(test)]
pub mod test_utils {
    use crate::github::{GitHubRepo, Release, ReleaseAsset};

    pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

    pub const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";

    pub fn test_repo() -> GitHubRepo {
        GitHubRepo {
            owner: "owner".to_string(),
            repo: "repo".to_string(),
        }
    }

    /// Builds a release whose assets carry the given download URLs, in order.
    pub fn release(tag: &str, prerelease: bool, urls: &[&str]) -> Release {
        Release {
            tag_name: tag.to_string(),
            name: Some(tag.to_string()),
            prerelease,
            assets: urls
                .iter()
                .enumerate()
                .map(|(i, url)| ReleaseAsset {
                    name: format!("asset-{}", i),
                    browser_download_url: Some(url.to_string()),
                })
                .collect(),
        }
    }
}
