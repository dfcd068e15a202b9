use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::timing::Throttle;

pub struct ScrollSpy {
    _scroll: Listener,
}

/// Position a section must have scrolled past to count as current.
pub fn threshold(scroll_y: f64, header_height: f64, offset: f64) -> f64 {
    scroll_y + header_height + offset
}

/// Last section (in document order) whose top is at or above `threshold`.
/// Assumes section offsets increase down the page.
pub fn current_section<'a>(sections: &'a [(String, f64)], threshold: f64) -> Option<&'a str> {
    sections
        .iter()
        .rev()
        .find(|(_, top)| *top <= threshold)
        .map(|(id, _)| id.as_str())
}

fn mark_active(links: &[Element], section_id: &str) {
    let href = format!("#{}", section_id);
    for link in links {
        dom::set_class(link, "active", false);
        let _ = link.remove_attribute("aria-current");
        if link.get_attribute("href").as_deref() == Some(href.as_str()) {
            dom::add_class(link, "active");
            let _ = link.set_attribute("aria-current", "page");
        }
    }
}

pub fn init(ctx: &Context) -> Result<Option<ScrollSpy>> {
    let sections: Vec<HtmlElement> = dom::query_all(&ctx.document, "section[id]")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    let links = dom::query_all(&ctx.document, ".nav-link[href^=\"#\"]");
    if sections.is_empty() || links.is_empty() {
        return Ok(None);
    }

    let header_height = dom::header_height(&ctx.document, ctx.config.header_fallback_px);
    let offset = ctx.config.spy_offset_px;
    let window = ctx.window.clone();

    let update = Rc::new(move || {
        let tops: Vec<(String, f64)> = sections
            .iter()
            .map(|s| (s.id(), f64::from(s.offset_top())))
            .collect();
        let pos = threshold(dom::scroll_y(&window), header_height, offset);
        if let Some(id) = current_section(&tops, pos) {
            mark_active(&links, id);
        }
    });

    let throttled = {
        let update = update.clone();
        Throttle::new(ctx.config.scroll_throttle_ms, move || update())
    };
    let scroll = Listener::new(&ctx.window, "scroll", move |_| throttled.call())?;
    update();

    Ok(Some(ScrollSpy { _scroll: scroll }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<(String, f64)> {
        vec![
            ("s1".to_string(), 0.0),
            ("s2".to_string(), 800.0),
            ("s3".to_string(), 1600.0),
        ]
    }

    #[test]
    fn picks_last_section_scrolled_past() {
        let pos = threshold(900.0, 70.0, 100.0);
        assert_eq!(current_section(&sections(), pos), Some("s2"));
    }

    #[test]
    fn top_of_page_is_first_section() {
        assert_eq!(current_section(&sections(), threshold(0.0, 70.0, 100.0)), Some("s1"));
    }

    #[test]
    fn boundary_is_inclusive() {
        assert_eq!(current_section(&sections(), 1600.0), Some("s3"));
        assert_eq!(current_section(&sections(), 1599.0), Some("s2"));
    }

    #[test]
    fn nothing_scrolled_past() {
        let below = vec![("late".to_string(), 5000.0)];
        assert_eq!(current_section(&below, 170.0), None);
    }
}
