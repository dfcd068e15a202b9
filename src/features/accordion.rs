use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::styles;

/// Target height of an accordion panel and whether its button shows collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTransition {
    pub height_px: i32,
    pub collapsed: bool,
}

pub fn transition(panel_shown: bool, scroll_height: i32) -> PanelTransition {
    if panel_shown {
        PanelTransition {
            height_px: 0,
            collapsed: true,
        }
    } else {
        PanelTransition {
            height_px: scroll_height,
            collapsed: false,
        }
    }
}

pub fn init(ctx: &Context) -> Result<Option<Vec<Listener>>> {
    let buttons = dom::query_all(&ctx.document, ".accordion-button");
    if buttons.is_empty() {
        return Ok(None);
    }

    let mut listeners = Vec::with_capacity(buttons.len());
    for button in buttons {
        let document = ctx.document.clone();
        let target = button.clone();
        listeners.push(Listener::new(&button, "click", move |_| {
            let Some(panel) = target
                .get_attribute("data-bs-target")
                .and_then(|selector| dom::query(&document, &selector))
            else {
                return;
            };
            let next = transition(dom::has_class(&panel, "show"), panel.scroll_height());
            dom::add_class(&panel, styles::ACCORDION_ANIMATED);
            dom::set_css_var(&panel, "--accordion-height", &format!("{}px", next.height_px));
            dom::set_class(&target, "collapsed", next.collapsed);
        })?);
    }
    Ok(Some(listeners))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_panel_collapses() {
        assert_eq!(
            transition(true, 240),
            PanelTransition {
                height_px: 0,
                collapsed: true
            }
        );
    }

    #[test]
    fn closed_panel_expands_to_content() {
        assert_eq!(
            transition(false, 240),
            PanelTransition {
                height_px: 240,
                collapsed: false
            }
        );
    }
}
