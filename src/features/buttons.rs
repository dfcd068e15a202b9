use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent};

use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::styles;

pub struct ButtonEffects {
    _listeners: Vec<Listener>,
}

/// Circle covering the button, centred on the click point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl Ripple {
    pub fn at(
        rect_left: f64,
        rect_top: f64,
        width: f64,
        height: f64,
        client_x: f64,
        client_y: f64,
    ) -> Self {
        let size = width.max(height);
        Self {
            size,
            left: client_x - rect_left - size / 2.0,
            top: client_y - rect_top - size / 2.0,
        }
    }
}

fn is_disabled(button: &Element) -> bool {
    dom::has_class(button, "disabled") || button.has_attribute("disabled")
}

fn spawn_ripple(ctx: &Context, button: &Element, click: &MouseEvent) -> Result<()> {
    let rect = button.get_bounding_client_rect();
    let ripple = Ripple::at(
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        f64::from(click.client_x()),
        f64::from(click.client_y()),
    );

    let span = ctx.document.create_element("span")?;
    span.set_class_name(styles::RIPPLE);
    dom::set_css_var(&span, "--ripple-size", &format!("{}px", ripple.size));
    dom::set_css_var(&span, "--ripple-x", &format!("{}px", ripple.left));
    dom::set_css_var(&span, "--ripple-y", &format!("{}px", ripple.top));

    dom::add_class(button, styles::RIPPLE_HOST);
    button.append_child(&span)?;

    ctx.timers.schedule(ctx.config.ripple_ms, move || {
        if span.is_connected() {
            span.remove();
        }
    });
    Ok(())
}

pub fn init(ctx: &Context) -> Result<Option<ButtonEffects>> {
    let buttons = dom::query_all(&ctx.document, ".btn, .c-button, a[class*=\"btn\"]");
    if buttons.is_empty() {
        return Ok(None);
    }

    let mut listeners = Vec::new();
    for button in buttons {
        listeners.push(Listener::new(&button, "mouseenter", {
            let button = button.clone();
            move |_| dom::add_class(&button, styles::HOVER_ARMED)
        })?);

        let ctx = ctx.clone();
        let target = button.clone();
        listeners.push(Listener::new(&button, "click", move |e: Event| {
            if is_disabled(&target) {
                return;
            }
            if let Some(click) = e.dyn_ref::<MouseEvent>() {
                if let Err(err) = spawn_ripple(&ctx, &target, click) {
                    log::debug!("Ripple skipped: {}", err);
                }
            }
        })?);
    }

    Ok(Some(ButtonEffects {
        _listeners: listeners,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ripple_is_centred_on_click() {
        let ripple = Ripple::at(100.0, 50.0, 200.0, 40.0, 150.0, 70.0);
        assert_eq!(ripple.size, 200.0);
        assert_eq!(ripple.left, -50.0);
        assert_eq!(ripple.top, -80.0);
    }

    #[test]
    fn tall_buttons_use_height() {
        assert_eq!(Ripple::at(0.0, 0.0, 30.0, 90.0, 15.0, 45.0).size, 90.0);
    }
}
