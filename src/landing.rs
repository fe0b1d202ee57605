//! Page controller: startup branching, the warning overlay, the settings panel
//! reveal, and the download-button lookups.

use anyhow::{Result, bail};
use futures_util::future::{self, FutureExt, LocalBoxFuture};
use log::{debug, error, info};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::{MOBILE_PANEL_CLASS, SiteConfig};
use crate::device::Device;
use crate::github::GetReleases;
use crate::page::{Element, Page, is_transparent};
use crate::resolver::{self, Channel, LinkOutcome};
use crate::timer::{Scheduler, Task, TimerHandle};

/// Per-load session state. Dropping it cancels every pending timer.
#[derive(Default)]
pub struct Session {
    started: Cell<bool>,
    /// Set once the warning overlay is visible; gates the reveal key.
    warning_shown: Cell<bool>,
    video_swapped: Cell<bool>,
    timers: RefCell<Vec<TimerHandle>>,
}

impl Session {
    pub fn warning_shown(&self) -> bool {
        self.warning_shown.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    fn keep(&self, handle: TimerHandle) {
        self.timers.borrow_mut().push(handle);
    }

    fn release_timers(&self) -> usize {
        let timers = std::mem::take(&mut *self.timers.borrow_mut());
        let count = timers.len();
        drop(timers);
        count
    }
}

/// Result of both download lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Downloads {
    pub stable: LinkOutcome,
    pub nightly: LinkOutcome,
}

/// What [`LandingPage::start`] did. On desktop the caller drives `downloads`
/// (spawned in the browser, awaited in the CLI).
pub struct Startup {
    pub device: Device,
    pub downloads: Option<LocalBoxFuture<'static, Downloads>>,
}

struct Inner {
    page: Rc<dyn Page>,
    scheduler: Rc<dyn Scheduler>,
    releases: Rc<dyn GetReleases>,
    config: SiteConfig,
    session: Session,
}

/// Controller for one page load. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct LandingPage {
    inner: Rc<Inner>,
}

impl LandingPage {
    pub fn new(
        page: Rc<dyn Page>,
        scheduler: Rc<dyn Scheduler>,
        releases: Rc<dyn GetReleases>,
        config: SiteConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                page,
                scheduler,
                releases,
                config,
                session: Session::default(),
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Runs the load-time sequence. Must be called once per page load.
    pub fn start(&self) -> Result<Startup> {
        let inner = &self.inner;
        if inner.session.started.replace(true) {
            bail!("Landing page already started");
        }

        let device = Device::classify(&inner.page.user_agent());
        info!("Is mobile: {}", device.is_mobile());

        match device {
            Device::Desktop => {
                let downloads = self.downloads();
                self.schedule(inner.config.warning_delay, |inner| {
                    inner.show_warning()
                });
                Ok(Startup {
                    device,
                    downloads: Some(downloads),
                })
            }
            Device::Mobile => {
                inner.swap_to_loop()?;
                inner.page.add_class(Element::Panel, MOBILE_PANEL_CLASS)?;
                self.reveal_panel()?;
                Ok(Startup {
                    device,
                    downloads: None,
                })
            }
        }
    }

    /// Looks up both download links concurrently and binds them to their buttons.
    pub fn downloads(&self) -> LocalBoxFuture<'static, Downloads> {
        let inner = self.inner.clone();
        async move {
            let repo = &inner.config.repo;
            let releases = inner.releases.as_ref();
            let page = inner.page.as_ref();
            let (stable, nightly) = future::join(
                resolver::bind(Channel::Stable, releases, repo, page),
                resolver::bind(Channel::Nightly, releases, repo, page),
            )
            .await;
            Downloads { stable, nightly }
        }
        .boxed_local()
    }

    /// The intro video finished. Switches to the looping clip the first time.
    pub fn on_video_ended(&self) -> Result<()> {
        self.inner.swap_to_loop()
    }

    /// Keyboard handler. The reveal key only works once the warning is up.
    pub fn on_key_down(&self, key: &str) -> Result<()> {
        let inner = &self.inner;
        if key != inner.config.reveal_key {
            return Ok(());
        }
        if !inner.session.warning_shown.get() {
            debug!("Ignoring {} before the warning is shown", key);
            return Ok(());
        }
        self.reveal_panel()
    }

    /// Shows the settings panel. Does nothing once the panel is visible.
    pub fn reveal_panel(&self) -> Result<()> {
        let inner = &self.inner;
        info!("Showing GUI");

        let opacity = inner.page.style(Element::Panel, "opacity")?;
        if !is_transparent(&opacity) {
            debug!("Panel already visible (opacity {})", opacity);
            return Ok(());
        }

        inner.page.set_style(Element::Warning, "opacity", "0")?;
        inner.page.set_style(Element::Panel, "opacity", "1")?;
        inner.page.set_style(Element::Panel, "pointer-events", "auto")?;

        self.schedule(inner.config.panel_expand_delay, |inner| {
            inner
                .page
                .set_style(Element::Panel, "height", &inner.config.panel_height)
        });
        self.schedule(inner.config.logo_delay, |inner| {
            inner.page.set_style(Element::Logo, "opacity", "1")
        });
        Ok(())
    }

    /// `pagehide` handler. A page kept in the back/forward cache may be shown
    /// again, so its timers stay armed.
    pub fn on_page_hide(&self, persisted: bool) {
        if persisted {
            debug!("Page cached for back/forward navigation; keeping timers");
            return;
        }
        self.teardown();
    }

    /// Cancels every timer that has not fired yet.
    pub fn teardown(&self) {
        let released = self.inner.session.release_timers();
        debug!("Released {} timer(s)", released);
    }

    fn schedule(&self, delay: std::time::Duration, step: fn(&Inner) -> Result<()>) {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let task: Task = Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(err) = step(&inner) {
                error!("Scheduled page update failed: {:#}", err);
            }
        });
        let handle = self.inner.scheduler.schedule(delay, task);
        self.inner.session.keep(handle);
    }
}

impl Inner {
    fn show_warning(&self) -> Result<()> {
        self.page.set_style(Element::Warning, "opacity", "1")?;
        self.page
            .set_style(Element::BackgroundVideo, "filter", "brightness(0.1)")?;
        self.session.warning_shown.set(true);
        Ok(())
    }

    fn swap_to_loop(&self) -> Result<()> {
        if self.session.video_swapped.replace(true) {
            return Ok(());
        }
        self.page.set_video_source(&self.config.loop_video)?;
        self.page.set_video_loop(true)
    }
}
