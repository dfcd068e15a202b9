use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Document;

mod config;
mod dom;
mod enhancer;
mod error;
mod state;
mod styles;
mod timing;
mod components {
    pub mod privacy_modal;
    pub mod scroll_top;
}
mod features {
    pub mod accordion;
    pub mod active_menu;
    pub mod buttons;
    pub mod cards;
    pub mod count_up;
    pub mod forms;
    pub mod media;
    pub mod nav;
    pub mod privacy;
    pub mod reveal;
    pub mod scroll_spy;
    pub mod smooth_scroll;
    pub mod validation;
}

use enhancer::Enhancer;

/// `document.readyState` before `DOMContentLoaded` has fired.
fn still_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn boot(document: &Document) {
    let config = config::load(document);
    match Enhancer::new(config) {
        Ok(mut enhancer) => {
            enhancer.init_all();
            // Listeners and timers live as long as the enhancer, which is the page lifetime.
            std::mem::forget(enhancer);
        }
        Err(e) => warn!("Site enhancements unavailable: {}", e),
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if still_loading(&document.ready_state()) {
        info!("Document still loading, deferring enhancements");
        let target = document.clone();
        let on_ready = Closure::once(move || boot(&target));
        if document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
            .is_ok()
        {
            on_ready.forget();
        }
    } else {
        boot(&document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defers_only_while_loading() {
        assert!(still_loading("loading"));
        assert!(!still_loading("interactive"));
        assert!(!still_loading("complete"));
    }
}
