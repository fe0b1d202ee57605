//! Mobile device detection from the browser's user-agent string.

use std::fmt;

/// User-agent fragments that identify a mobile platform. Matched ignoring ASCII case.
pub const MOBILE_SIGNATURES: [&str; 7] = [
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "Windows Phone",
];

/// Returns true if the user agent contains any of [`MOBILE_SIGNATURES`].
pub fn is_mobile(user_agent: &str) -> bool {
    let user_agent = user_agent.to_ascii_lowercase();
    MOBILE_SIGNATURES
        .iter()
        .any(|signature| user_agent.contains(&signature.to_ascii_lowercase()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Mobile,
    Desktop,
}

impl Device {
    pub fn classify(user_agent: &str) -> Self {
        if is_mobile(user_agent) {
            Device::Mobile
        } else {
            Device::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Device::Mobile
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Mobile => write!(f, "mobile"),
            Device::Desktop => write!(f, "desktop"),
        }
    }
}
