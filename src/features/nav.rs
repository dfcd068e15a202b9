use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent, Node};

use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::state::Observable;
use crate::styles;
use crate::timing::Debounce;

/// Mobile navigation: toggler button plus collapsible panel.
pub struct NavMenu {
    _listeners: Vec<Listener>,
}

/// A click outside both the panel and its toggler dismisses the menu.
fn is_outside(target: Option<&Node>, panel: &Element, toggler: &Element) -> bool {
    !panel.contains(target) && !toggler.contains(target)
}

pub fn init(ctx: &Context) -> Result<Option<NavMenu>> {
    let (Some(toggler), Some(panel)) = (
        dom::query(&ctx.document, ".navbar-toggler"),
        dom::query(&ctx.document, ".navbar-collapse"),
    ) else {
        return Ok(None);
    };

    let open = Observable::new(false);
    {
        let toggler = toggler.clone();
        let panel = panel.clone();
        let body = ctx.body.clone();
        open.subscribe(move |is_open| {
            dom::set_class(&panel, "show", *is_open);
            dom::set_class(&panel, styles::NAV_FULLHEIGHT, *is_open);
            dom::set_class(&body, styles::NO_SCROLL, *is_open);
            let _ = toggler.set_attribute("aria-expanded", if *is_open { "true" } else { "false" });
        });
    }

    let mut listeners = Vec::new();

    listeners.push(Listener::new(&toggler, "click", {
        let open = open.clone();
        move |e: Event| {
            e.prevent_default();
            open.update(|v| !v);
        }
    })?);

    listeners.push(Listener::new(&ctx.document, "keydown", {
        let open = open.clone();
        move |e: Event| {
            let is_escape = e
                .dyn_ref::<KeyboardEvent>()
                .map(|k| k.key() == "Escape")
                .unwrap_or(false);
            if is_escape && open.get() {
                open.set(false);
            }
        }
    })?);

    listeners.push(Listener::new(&ctx.document, "click", {
        let open = open.clone();
        let panel = panel.clone();
        let toggler = toggler.clone();
        move |e: Event| {
            if !open.get() {
                return;
            }
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if is_outside(target.as_ref(), &panel, &toggler) {
                open.set(false);
            }
        }
    })?);

    for link in dom::query_all_in(&panel, ".nav-link") {
        let open = open.clone();
        listeners.push(Listener::new(&link, "click", move |_| open.set(false))?);
    }

    let debounced_resize = {
        let open = open.clone();
        let window = ctx.window.clone();
        let breakpoint = ctx.config.nav_breakpoint_px;
        Debounce::new(ctx.config.resize_debounce_ms, move || {
            let width = window
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or(0.0);
            if width >= breakpoint && open.get() {
                open.set(false);
            }
        })
    };
    listeners.push(Listener::new(&ctx.window, "resize", move |_| {
        debounced_resize.call()
    })?);

    Ok(Some(NavMenu {
        _listeners: listeners,
    }))
}
