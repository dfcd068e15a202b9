use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::EventTarget;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    /// Mounted but not yet faded in.
    Entering,
    Open,
    /// Fading out; the owner is told to remove the modal once done.
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    FadedIn,
    Close,
}

impl ModalPhase {
    pub fn is_shown(self) -> bool {
        self == ModalPhase::Open
    }

    pub fn next(self, action: ModalAction) -> Self {
        match (self, action) {
            (ModalPhase::Entering, ModalAction::FadedIn) => ModalPhase::Open,
            (_, ModalAction::Close) => ModalPhase::Closing,
            (phase, ModalAction::FadedIn) => phase,
        }
    }
}

impl Reducible for ModalPhase {
    type Action = ModalAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.next(action))
    }
}

#[derive(Properties, PartialEq)]
pub struct PrivacyModalProps {
    pub title: AttrValue,
    pub body: AttrValue,
    pub close_label: AttrValue,
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
    pub on_closed: Callback<()>,
}

#[function_component(PrivacyModal)]
pub fn privacy_modal(props: &PrivacyModalProps) -> Html {
    let phase = use_reducer(|| ModalPhase::Entering);
    let backdrop = use_node_ref();

    {
        let phase = phase.dispatcher();
        let delay = props.fade_in_ms;
        use_effect_with_deps(
            move |_| {
                let fade_in = Timeout::new(delay, move || phase.dispatch(ModalAction::FadedIn));
                move || drop(fade_in)
            },
            (),
        );
    }

    {
        let on_closed = props.on_closed.clone();
        let delay = props.fade_out_ms;
        use_effect_with_deps(
            move |current: &ModalPhase| {
                let fade_out = (*current == ModalPhase::Closing)
                    .then(|| Timeout::new(delay, move || on_closed.emit(())));
                move || drop(fade_out)
            },
            *phase,
        );
    }

    let close = {
        let phase = phase.dispatcher();
        Callback::from(move |_: MouseEvent| phase.dispatch(ModalAction::Close))
    };

    let on_backdrop = {
        let phase = phase.dispatcher();
        let backdrop = backdrop.clone();
        Callback::from(move |e: MouseEvent| {
            // Only the overlay itself, not clicks bubbling up from the dialog.
            if e.target().is_some() && e.target() == backdrop.get().map(EventTarget::from) {
                phase.dispatch(ModalAction::Close);
            }
        })
    };

    html! {
        <div
            ref={backdrop}
            class={classes!("privacy-modal", (*phase).is_shown().then(|| "is-open"))}
            role="dialog"
            aria-modal="true"
            onclick={on_backdrop}
        >
            <div class="privacy-modal__dialog">
                <h3>{props.title.clone()}</h3>
                <p>{props.body.clone()}</p>
                <button class="btn btn-primary mt-3" onclick={close}>
                    {props.close_label.clone()}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_in_once() {
        assert_eq!(ModalPhase::Entering.next(ModalAction::FadedIn), ModalPhase::Open);
        assert_eq!(ModalPhase::Open.next(ModalAction::FadedIn), ModalPhase::Open);
        assert!(ModalPhase::Open.is_shown());
    }

    #[test]
    fn close_works_from_any_phase() {
        for phase in [ModalPhase::Entering, ModalPhase::Open, ModalPhase::Closing] {
            assert_eq!(phase.next(ModalAction::Close), ModalPhase::Closing);
        }
    }

    #[test]
    fn closing_is_not_reopened_by_late_fade_in() {
        assert_eq!(ModalPhase::Closing.next(ModalAction::FadedIn), ModalPhase::Closing);
        assert!(!ModalPhase::Closing.is_shown());
        assert!(!ModalPhase::Entering.is_shown());
    }
}
