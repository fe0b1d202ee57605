use serde::{Deserialize, Serialize};

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name: String,
    pub browser_download_url: Option<String>,
}

/// Represents a GitHub release
///
/// Missing fields fall back to their defaults so that one odd entry in a
/// release list does not spoil the others.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Download URL of the first asset, if it has a usable one.
    pub fn download_url(&self) -> Option<&str> {
        self.assets
            .first()
            .and_then(|asset| asset.browser_download_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}
