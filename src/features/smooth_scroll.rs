use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;

const SAME_PAGE_LINKS: &str = "a[href^=\"#\"]";

pub struct SmoothScroll {
    _click: Option<Listener>,
}

pub fn is_home_path(path: &str) -> bool {
    path == "/" || path == "/index.html"
}

/// `#` and `#!` are script hooks, not anchors.
pub fn is_fragment_only(href: &str) -> bool {
    href == "#" || href == "#!"
}

/// Section anchors only exist on the home page, so elsewhere they must point there.
pub fn rewrite_section_href(href: &str) -> Option<String> {
    if is_fragment_only(href) || !href.starts_with("#section-") {
        return None;
    }
    Some(format!("/{}", href))
}

/// Document offset to scroll to so the target sits just below the header.
pub fn scroll_target(rect_top: f64, scroll_y: f64, header_height: f64) -> f64 {
    rect_top + scroll_y - header_height
}

pub fn init(ctx: &Context) -> Result<Option<SmoothScroll>> {
    let path = ctx.window.location().pathname()?;
    if !is_home_path(&path) {
        for link in dom::query_all(&ctx.document, SAME_PAGE_LINKS) {
            let rewritten = link
                .get_attribute("href")
                .as_deref()
                .and_then(rewrite_section_href);
            if let Some(rewritten) = rewritten {
                link.set_attribute("href", &rewritten)?;
            }
        }
        return Ok(Some(SmoothScroll { _click: None }));
    }

    let window = ctx.window.clone();
    let document = ctx.document.clone();
    let fallback = ctx.config.header_fallback_px;
    let click = Listener::new(&ctx.document, "click", move |e: Event| {
        let Some(anchor) = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(SAME_PAGE_LINKS).ok().flatten())
        else {
            return;
        };
        let Some(href) = anchor.get_attribute("href") else {
            return;
        };
        if is_fragment_only(&href) {
            return;
        }

        e.prevent_default();
        if let Some(target) = dom::query(&document, &href) {
            let top = scroll_target(
                target.get_bounding_client_rect().top(),
                dom::scroll_y(&window),
                dom::header_height(&document, fallback),
            );
            dom::smooth_scroll_to(&window, top);
        }
    })?;

    Ok(Some(SmoothScroll { _click: Some(click) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_paths() {
        assert!(is_home_path("/"));
        assert!(is_home_path("/index.html"));
        assert!(!is_home_path("/about.html"));
    }

    #[test]
    fn only_section_anchors_are_rewritten() {
        assert_eq!(rewrite_section_href("#section-team"), Some("/#section-team".to_string()));
        assert_eq!(rewrite_section_href("#"), None);
        assert_eq!(rewrite_section_href("#!"), None);
        assert_eq!(rewrite_section_href("#top"), None);
    }

    #[test]
    fn target_offset_discounts_header() {
        assert_eq!(scroll_target(250.0, 1000.0, 70.0), 1180.0);
    }
}
