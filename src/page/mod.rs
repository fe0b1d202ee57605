//! The slice of the DOM the landing page touches.
//!
//! [`Page`] is implemented by [`WebPage`] over `web-sys` in the browser and by
//! [`MemoryPage`] everywhere else.

use anyhow::Result;
use std::fmt;

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::{MemoryPage, PageSnapshot};
#[cfg(target_arch = "wasm32")]
pub use web::WebPage;

/// Elements of the landing page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    BackgroundVideo,
    Warning,
    Panel,
    Logo,
    ReleaseButton,
    NightlyButton,
}

impl Element {
    pub fn selector(self) -> &'static str {
        match self {
            Element::BackgroundVideo => ".background-video",
            Element::Warning => ".warn",
            Element::Panel => ".gui",
            Element::Logo => ".logo",
            Element::ReleaseButton => "#release",
            Element::NightlyButton => "#nightly",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// DOM operations the controller and the resolvers need.
///
/// Lookups fail with an error when the element is missing from the markup.
pub trait Page {
    fn user_agent(&self) -> String;

    /// Inline style property; empty when unset.
    fn style(&self, element: Element, property: &str) -> Result<String>;
    fn set_style(&self, element: Element, property: &str, value: &str) -> Result<()>;

    fn add_class(&self, element: Element, class: &str) -> Result<()>;
    fn set_attribute(&self, element: Element, name: &str, value: &str) -> Result<()>;

    fn set_video_source(&self, src: &str) -> Result<()>;
    fn set_video_loop(&self, looping: bool) -> Result<()>;
}

/// Reads an opacity value the way the page script compares it with zero:
/// unset and numerically zero both count as hidden.
pub fn is_transparent(opacity: &str) -> bool {
    let opacity = opacity.trim();
    opacity.is_empty() || opacity.parse::<f64>().map(|v| v == 0.0).unwrap_or(false)
}
