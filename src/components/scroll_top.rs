use web_sys::Element;
use yew::prelude::*;
use yew::AppHandle;

use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::timing::Throttle;

pub fn is_visible(scroll_y: f64, threshold_px: f64) -> bool {
    scroll_y > threshold_px
}

#[derive(Properties, PartialEq)]
pub struct ScrollToTopProps {
    pub label: AttrValue,
    pub threshold_px: f64,
    pub throttle_ms: u32,
}

#[function_component(ScrollToTop)]
pub fn scroll_to_top(props: &ScrollToTopProps) -> Html {
    let visible = use_state(|| false);

    {
        let visible = visible.setter();
        let threshold_px = props.threshold_px;
        let throttle_ms = props.throttle_ms;
        use_effect_with_deps(
            move |_| {
                let listener = web_sys::window().and_then(|window| {
                    let check = {
                        let window = window.clone();
                        move || visible.set(is_visible(dom::scroll_y(&window), threshold_px))
                    };
                    // Initial check, a reload can land mid-page
                    check();
                    let throttled = Throttle::new(throttle_ms, check);
                    Listener::new(&window, "scroll", move |_| throttled.call()).ok()
                });
                move || drop(listener)
            },
            (),
        );
    }

    let onclick = Callback::from(|_: MouseEvent| {
        if let Some(window) = web_sys::window() {
            dom::smooth_scroll_to(&window, 0.0);
        }
    });

    html! {
        <button
            class={classes!("scroll-to-top", (*visible).then(|| "is-visible"))}
            aria-label={props.label.clone()}
            {onclick}
        >
            {"↑"}
        </button>
    }
}

/// The injected button together with the element it is rendered into.
pub struct ScrollTopButton {
    _app: AppHandle<ScrollToTop>,
    _host: Element,
}

pub fn mount(ctx: &Context) -> Result<Option<ScrollTopButton>> {
    let host = ctx.document.create_element("div")?;
    host.set_class_name("scroll-to-top-host");
    ctx.body.append_child(&host)?;

    let props = ScrollToTopProps {
        label: AttrValue::from(ctx.config.strings.scroll_to_top_label.clone()),
        threshold_px: ctx.config.scroll_top_threshold_px,
        throttle_ms: ctx.config.scroll_throttle_ms,
    };
    let app = yew::Renderer::<ScrollToTop>::with_root_and_props(host.clone(), props).render();

    Ok(Some(ScrollTopButton {
        _app: app,
        _host: host,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_only_past_threshold() {
        assert!(!is_visible(0.0, 500.0));
        assert!(!is_visible(500.0, 500.0));
        assert!(is_visible(501.0, 500.0));
        assert!(is_visible(2400.0, 500.0));
    }
}
