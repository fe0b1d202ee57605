//! Browser entry point: wires the controller to the live page once it has loaded.

use anyhow::{Context, Result, anyhow};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, KeyboardEvent, PageTransitionEvent, Window};

use crate::config::SiteConfig;
use crate::device::Device;
use crate::github::GitHub;
use crate::landing::LandingPage;
use crate::page::{Element, WebPage};
use crate::timer::BrowserTimers;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;

    let on_load = Closure::once(move || {
        if let Err(err) = boot() {
            log::error!("Landing page failed to start: {:#}", err);
        }
    });
    window.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    on_load.forget();
    Ok(())
}

fn boot() -> Result<()> {
    let window = web_sys::window().context("window unavailable")?;
    let page = Rc::new(WebPage::new(window.clone())?);
    let config = SiteConfig::default();
    let github = GitHub::new(reqwest::Client::new(), Some(config.api_url.clone()));
    let landing = LandingPage::new(
        page.clone(),
        Rc::new(BrowserTimers),
        Rc::new(github),
        config,
    );

    let startup = landing.start()?;
    if let Some(downloads) = startup.downloads {
        wasm_bindgen_futures::spawn_local(async move {
            let _ = downloads.await;
        });
    }

    if startup.device == Device::Desktop {
        listen_video_ended(&page, &landing)?;
        listen_keys(&page, &landing)?;
    }
    listen_teardown(&window, &landing)?;
    Ok(())
}

fn listen_video_ended(page: &WebPage, landing: &LandingPage) -> Result<()> {
    let video = page.element(Element::BackgroundVideo)?;
    let landing = landing.clone();
    let on_ended = Closure::once(move || {
        if let Err(err) = landing.on_video_ended() {
            log::error!("Failed to switch background video: {:#}", err);
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    video
        .add_event_listener_with_callback_and_add_event_listener_options(
            "ended",
            on_ended.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| anyhow!("{:?}", e))?;
    on_ended.forget();
    Ok(())
}

fn listen_keys(page: &WebPage, landing: &LandingPage) -> Result<()> {
    let landing = landing.clone();
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if let Err(err) = landing.on_key_down(&event.key()) {
            log::error!("Key handler failed: {:#}", err);
        }
    });
    page.document()
        .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("{:?}", e))?;
    // Lives as long as the page.
    on_key.forget();
    Ok(())
}

fn listen_teardown(window: &Window, landing: &LandingPage) -> Result<()> {
    let landing = landing.clone();
    // Fires again each time a cached page is left, so it must not be a once closure.
    let on_hide = Closure::<dyn FnMut(PageTransitionEvent)>::new(
        move |event: PageTransitionEvent| landing.on_page_hide(event.persisted()),
    );
    window
        .add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("{:?}", e))?;
    on_hide.forget();
    Ok(())
}
