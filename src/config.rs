use std::time::Duration;

use crate::github::GitHubRepo;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OWNER: &str = "unknproject";
pub const DEFAULT_REPO: &str = "unknproject";

/// Video played after the intro clip ends.
pub const LOOP_VIDEO: &str = "static/assets/background_loop.mp4";

/// Key that opens the settings panel on desktop.
pub const REVEAL_KEY: &str = "Insert";

/// Class marking a download button without a usable link.
pub const DISABLED_CLASS: &str = "disabled";

/// Class switching the settings panel to its mobile layout.
pub const MOBILE_PANEL_CLASS: &str = "gui-mobile";

/// Everything the landing page needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Repository whose releases feed the download buttons.
    pub repo: GitHubRepo,
    /// Base URL of the release-hosting API.
    pub api_url: String,
    pub loop_video: String,
    pub reveal_key: String,
    /// Delay before the warning overlay appears on desktop.
    pub warning_delay: Duration,
    /// Delay before the revealed panel grows to full height.
    pub panel_expand_delay: Duration,
    /// Delay before the logo inside the revealed panel fades in.
    pub logo_delay: Duration,
    /// Height the panel grows to once revealed.
    pub panel_height: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            repo: GitHubRepo {
                owner: DEFAULT_OWNER.to_string(),
                repo: DEFAULT_REPO.to_string(),
            },
            api_url: DEFAULT_API_URL.to_string(),
            loop_video: LOOP_VIDEO.to_string(),
            reveal_key: REVEAL_KEY.to_string(),
            warning_delay: Duration::from_millis(2000),
            panel_expand_delay: Duration::from_millis(300),
            logo_delay: Duration::from_millis(400),
            panel_height: "400px".to_string(),
        }
    }
}

impl SiteConfig {
    /// Applies overrides coming from flags or environment variables.
    pub fn with_overrides(mut self, repo: Option<GitHubRepo>, api_url: Option<String>) -> Self {
        if let Some(repo) = repo {
            self.repo = repo;
        }
        if let Some(api_url) = api_url {
            self.api_url = api_url.trim_end_matches('/').to_string();
        }
        self
    }
}
