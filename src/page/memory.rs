use anyhow::{Result, bail};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{Element, Page};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub style: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

/// Copy of everything a [`MemoryPage`] has recorded so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSnapshot {
    pub elements: BTreeMap<Element, ElementState>,
    pub video_source: Option<String>,
    pub video_loop: bool,
}

impl PageSnapshot {
    pub fn style(&self, element: Element, property: &str) -> Option<&str> {
        self.elements
            .get(&element)
            .and_then(|state| state.style.get(property))
            .map(String::as_str)
    }

    pub fn attribute(&self, element: Element, name: &str) -> Option<&str> {
        self.elements
            .get(&element)
            .and_then(|state| state.attributes.get(name))
            .map(String::as_str)
    }

    pub fn has_class(&self, element: Element, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|state| state.classes.iter().any(|c| c == class))
    }
}

impl fmt::Display for PageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "video: src={} loop={}",
            self.video_source.as_deref().unwrap_or("<initial>"),
            self.video_loop
        )?;
        for (element, state) in &self.elements {
            write!(f, "{}:", element)?;
            for (property, value) in &state.style {
                write!(f, " {}={}", property, value)?;
            }
            for (name, value) in &state.attributes {
                write!(f, " [{}={}]", name, value)?;
            }
            if !state.classes.is_empty() {
                write!(f, " class=\"{}\"", state.classes.join(" "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// In-memory stand-in for the browser DOM.
///
/// Used by the CLI's `simulate` command and by tests. Every element exists
/// unless removed with [`MemoryPage::without`].
pub struct MemoryPage {
    user_agent: String,
    missing: BTreeSet<Element>,
    state: RefCell<PageSnapshot>,
    mutations: Cell<usize>,
}

impl MemoryPage {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            missing: BTreeSet::new(),
            state: RefCell::new(PageSnapshot::default()),
            mutations: Cell::new(0),
        }
    }

    /// Drops an element from the markup.
    pub fn without(mut self, element: Element) -> Self {
        self.missing.insert(element);
        self
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.state.borrow().clone()
    }

    /// Number of successful writes since creation.
    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    fn lookup(&self, element: Element) -> Result<()> {
        if self.missing.contains(&element) {
            bail!("Element not found: {}", element.selector());
        }
        Ok(())
    }

    fn mutate(&self, element: Element, f: impl FnOnce(&mut ElementState)) -> Result<()> {
        self.lookup(element)?;
        f(self.state.borrow_mut().elements.entry(element).or_default());
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }
}

impl Page for MemoryPage {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn style(&self, element: Element, property: &str) -> Result<String> {
        self.lookup(element)?;
        Ok(self
            .state
            .borrow()
            .style(element, property)
            .unwrap_or_default()
            .to_string())
    }

    fn set_style(&self, element: Element, property: &str, value: &str) -> Result<()> {
        self.mutate(element, |state| {
            state.style.insert(property.to_string(), value.to_string());
        })
    }

    fn add_class(&self, element: Element, class: &str) -> Result<()> {
        self.mutate(element, |state| {
            if !state.classes.iter().any(|c| c == class) {
                state.classes.push(class.to_string());
            }
        })
    }

    fn set_attribute(&self, element: Element, name: &str, value: &str) -> Result<()> {
        self.mutate(element, |state| {
            state.attributes.insert(name.to_string(), value.to_string());
        })
    }

    fn set_video_source(&self, src: &str) -> Result<()> {
        self.lookup(Element::BackgroundVideo)?;
        self.state.borrow_mut().video_source = Some(src.to_string());
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }

    fn set_video_loop(&self, looping: bool) -> Result<()> {
        self.lookup(Element::BackgroundVideo)?;
        self.state.borrow_mut().video_loop = looping;
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }
}
