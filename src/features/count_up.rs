use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use crate::dom::{self, VisibilityObserver};
use crate::enhancer::Context;
use crate::error::Result;

const VISIBLE_SHARE: f64 = 0.5;

/// Leading integer of `raw`, like `parseInt(raw, 10)`.
pub fn parse_target(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Digit runs past the i64 range saturate instead of disabling the counter.
    let magnitude = digits[..end].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(sign * magnitude)
}

/// Value shown `elapsed_ms` into the animation. Reaches `target` exactly at `duration_ms`.
pub fn value_at(target: i64, elapsed_ms: f64, duration_ms: f64) -> i64 {
    if target <= 0 || elapsed_ms >= duration_ms || duration_ms <= 0.0 {
        return target;
    }
    let progress = (elapsed_ms / duration_ms).max(0.0);
    ((target as f64) * progress).floor() as i64
}

type FrameCallback = Closure<dyn FnMut(f64)>;

fn animate(window: Window, element: Element, target: i64, duration_ms: f64) {
    let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let mut started: Option<f64> = None;
    let scheduler = window.clone();

    *frame.borrow_mut() = Some(Closure::new(move |now: f64| {
        let start = *started.get_or_insert(now);
        let value = value_at(target, now - start, duration_ms);
        element.set_text_content(Some(&value.to_string()));

        if value == target || !element.is_connected() {
            // Drop our handle to this closure so it is cleaned up once we return.
            let _ = next.borrow_mut().take();
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            let _ = scheduler.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }));

    let first = frame.borrow();
    if let Some(callback) = first.as_ref() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    }
}

pub fn init(ctx: &Context) -> Result<Option<VisibilityObserver>> {
    let counters = dom::query_all(&ctx.document, "[data-count]");
    if counters.is_empty() || !dom::supports(&ctx.window, "IntersectionObserver") {
        return Ok(None);
    }

    let window = ctx.window.clone();
    let duration_ms = ctx.config.count_duration_ms;
    let observer = VisibilityObserver::once(VISIBLE_SHARE, None, move |element| {
        let target = element
            .get_attribute("data-count")
            .as_deref()
            .and_then(parse_target);
        if let Some(target) = target {
            animate(window.clone(), element, target, duration_ms);
        }
    })?;
    for counter in &counters {
        observer.observe(counter);
    }
    Ok(Some(observer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_like_parse_int() {
        assert_eq!(parse_target("250"), Some(250));
        assert_eq!(parse_target(" 98%"), Some(98));
        assert_eq!(parse_target("-5"), Some(-5));
        assert_eq!(parse_target("1.5k"), Some(1));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
    }

    #[test]
    fn oversized_targets_saturate() {
        assert_eq!(parse_target("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_target("-99999999999999999999+"), Some(-i64::MAX));
        assert_eq!(value_at(i64::MAX, 2000.0, 2000.0), i64::MAX);
    }

    #[test]
    fn climbs_then_lands_on_target() {
        assert_eq!(value_at(1000, 0.0, 2000.0), 0);
        assert_eq!(value_at(1000, 1000.0, 2000.0), 500);
        assert_eq!(value_at(1000, 1999.0, 2000.0), 999);
        assert_eq!(value_at(1000, 2000.0, 2000.0), 1000);
        assert_eq!(value_at(1000, 9000.0, 2000.0), 1000);
    }

    #[test]
    fn never_overshoots() {
        let mut last = 0;
        for ms in (0..=2100).step_by(16) {
            let v = value_at(37, f64::from(ms), 2000.0);
            assert!(v >= last && v <= 37);
            last = v;
        }
        assert_eq!(last, 37);
    }

    #[test]
    fn non_positive_targets_show_immediately() {
        assert_eq!(value_at(0, 0.0, 2000.0), 0);
        assert_eq!(value_at(-12, 10.0, 2000.0), -12);
    }
}
