use anyhow::{Context, Result, anyhow};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlMediaElement, Window};

use super::{Element, Page};

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{:?}", value)
}

/// [`Page`] backed by the live document.
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window) -> Result<Self> {
        let document = window.document().context("Window has no document")?;
        Ok(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Looks up an element by its selector.
    pub fn element(&self, element: Element) -> Result<HtmlElement> {
        self.document
            .query_selector(element.selector())
            .map_err(js_error)?
            .with_context(|| format!("Element not found: {}", element.selector()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| anyhow!("Element is not an HTML element: {}", element.selector()))
    }

    fn video(&self) -> Result<HtmlMediaElement> {
        self.element(Element::BackgroundVideo)?
            .dyn_into::<HtmlMediaElement>()
            .map_err(|_| anyhow!("Element is not a media element: {}", Element::BackgroundVideo))
    }
}

impl Page for WebPage {
    fn user_agent(&self) -> String {
        self.window.navigator().user_agent().unwrap_or_default()
    }

    fn style(&self, element: Element, property: &str) -> Result<String> {
        self.element(element)?
            .style()
            .get_property_value(property)
            .map_err(js_error)
    }

    fn set_style(&self, element: Element, property: &str, value: &str) -> Result<()> {
        self.element(element)?
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn add_class(&self, element: Element, class: &str) -> Result<()> {
        self.element(element)?
            .class_list()
            .add_1(class)
            .map_err(js_error)
    }

    fn set_attribute(&self, element: Element, name: &str, value: &str) -> Result<()> {
        self.element(element)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn set_video_source(&self, src: &str) -> Result<()> {
        self.video()?.set_src(src);
        Ok(())
    }

    fn set_video_loop(&self, looping: bool) -> Result<()> {
        self.video()?.set_loop(looping);
        Ok(())
    }
}
