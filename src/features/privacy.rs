use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::warn;
use web_sys::{Element, Event};
use yew::{AppHandle, AttrValue, Callback};

use crate::components::privacy_modal::{PrivacyModal, PrivacyModalProps};
use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;

struct ModalSession {
    app: AppHandle<PrivacyModal>,
    host: Element,
}

type SessionSlot = Rc<RefCell<Option<ModalSession>>>;

pub struct PrivacyLinks {
    _listeners: Vec<Listener>,
    _session: SessionSlot,
}

/// Only links that do not lead to a real privacy page open the modal.
pub fn is_placeholder(href: &str, placeholders: &[String]) -> bool {
    placeholders.iter().any(|p| p == href)
}

fn tear_down(session: &Weak<RefCell<Option<ModalSession>>>) {
    let Some(session) = session.upgrade() else {
        return;
    };
    let taken = session.borrow_mut().take();
    if let Some(ModalSession { app, host }) = taken {
        app.destroy();
        host.remove();
    }
}

fn open(ctx: &Context, session: &SessionSlot) -> Result<()> {
    if session.borrow().is_some() {
        return Ok(());
    }

    let host = ctx.document.create_element("div")?;
    host.set_class_name("privacy-modal-host");
    ctx.body.append_child(&host)?;

    let on_closed = {
        let session = Rc::downgrade(session);
        let timers = ctx.timers.clone();
        // The app must not be destroyed from inside its own callback.
        Callback::from(move |_: ()| {
            let session = session.clone();
            timers.schedule(0, move || tear_down(&session));
        })
    };

    let strings = &ctx.config.strings;
    let props = PrivacyModalProps {
        title: AttrValue::from(strings.privacy_title.clone()),
        body: AttrValue::from(strings.privacy_body.clone()),
        close_label: AttrValue::from(strings.close.clone()),
        fade_in_ms: ctx.config.modal_fade_in_ms,
        fade_out_ms: ctx.config.modal_fade_out_ms,
        on_closed,
    };
    let app = yew::Renderer::<PrivacyModal>::with_root_and_props(host.clone(), props).render();
    *session.borrow_mut() = Some(ModalSession { app, host });
    Ok(())
}

pub fn init(ctx: &Context) -> Result<Option<PrivacyLinks>> {
    let links = dom::query_all(&ctx.document, "a[href*=\"privacy\"]");
    if links.is_empty() {
        return Ok(None);
    }

    let session: SessionSlot = Rc::new(RefCell::new(None));
    let mut listeners = Vec::with_capacity(links.len());
    for link in links {
        let ctx = ctx.clone();
        let session = session.clone();
        let target = link.clone();
        listeners.push(Listener::new(&link, "click", move |e: Event| {
            let href = target.get_attribute("href").unwrap_or_default();
            if !is_placeholder(&href, &ctx.config.privacy_placeholder_hrefs) {
                return;
            }
            e.prevent_default();
            if let Err(err) = open(&ctx, &session) {
                warn!("Privacy notice could not be shown: {}", err);
            }
        })?);
    }

    Ok(Some(PrivacyLinks {
        _listeners: listeners,
        _session: session,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_hrefs_are_intercepted() {
        let placeholders = vec!["#".to_string(), "privacy.html".to_string()];
        assert!(is_placeholder("#", &placeholders));
        assert!(is_placeholder("privacy.html", &placeholders));
        assert!(!is_placeholder("/privacy-policy/", &placeholders));
        assert!(!is_placeholder("", &placeholders));
    }
}
