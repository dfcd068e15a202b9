use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Window};

use crate::config::{SiteConfig, Strings};
use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::features::validation::{self, FieldSnapshot, FieldState};
use crate::styles;

const SPINNER: &str = r#"<span class="spinner-border spinner-border-sm me-2"></span>"#;

pub struct FormValidation {
    _listeners: Vec<Listener>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A previous submission is still on its way to the confirmation page.
    Ignored,
    Blocked,
    Sending,
}

pub fn submit_outcome(already_sending: bool, all_valid: bool) -> SubmitOutcome {
    match (already_sending, all_valid) {
        (true, _) => SubmitOutcome::Ignored,
        (false, false) => SubmitOutcome::Blocked,
        (false, true) => SubmitOutcome::Sending,
    }
}

struct Field {
    element: Element,
    state: Cell<FieldState>,
}

fn snapshot(element: &Element) -> FieldSnapshot {
    let key = element
        .get_attribute("name")
        .filter(|name| !name.is_empty())
        .or_else(|| element.get_attribute("id"))
        .unwrap_or_default();

    let (value, is_checkbox, checked) = if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        (input.value(), input.type_() == "checkbox", input.checked())
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        (area.value(), false, false)
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        (select.value(), false, false)
    } else {
        (String::new(), false, false)
    };

    FieldSnapshot {
        key,
        value,
        required: element.has_attribute("required"),
        is_checkbox,
        checked,
    }
}

fn feedback_for(element: &Element, create: bool) -> Option<Element> {
    let parent = element.parent_element()?;
    if let Some(existing) = parent.query_selector(".invalid-feedback").ok().flatten() {
        return Some(existing);
    }
    if !create {
        return None;
    }
    let feedback = element.owner_document()?.create_element("div").ok()?;
    feedback.set_class_name("invalid-feedback");
    parent.append_child(&feedback).ok()?;
    Some(feedback)
}

fn show_error(element: &Element, message: &str) {
    dom::add_class(element, "is-invalid");
    if let Some(feedback) = feedback_for(element, true) {
        feedback.set_text_content(Some(message));
        dom::set_class(&feedback, styles::FEEDBACK_HIDDEN, false);
        dom::add_class(&feedback, styles::FEEDBACK_SHOWN);
    }
}

fn clear_error(element: &Element) {
    dom::set_class(element, "is-invalid", false);
    if let Some(feedback) = feedback_for(element, false) {
        dom::set_class(&feedback, styles::FEEDBACK_SHOWN, false);
        dom::add_class(&feedback, styles::FEEDBACK_HIDDEN);
    }
}

fn validate(field: &Field, strings: &Strings) -> bool {
    let result = validation::check(&snapshot(&field.element));
    clear_error(&field.element);
    if let Some(violation) = result {
        show_error(&field.element, violation.message(strings));
    }
    field.state.set(FieldState::after(result));
    result.is_none()
}

/// Submit button appearance around a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPhase {
    Idle,
    Sending,
}

impl ButtonPhase {
    pub fn disabled(self) -> bool {
        self == ButtonPhase::Sending
    }

    pub fn shows_spinner(self) -> bool {
        self == ButtonPhase::Sending
    }
}

/// Where an accepted form goes and how long it waits first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendPlan {
    pub delay_ms: u32,
    pub thank_you_url: String,
    pub label: String,
}

impl SendPlan {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            delay_ms: config.submit_delay_ms,
            thank_you_url: config.thank_you_url.clone(),
            label: config.strings.sending.clone(),
        }
    }
}

fn show_phase(button: &Element, phase: ButtonPhase, label: &str, original: &str) {
    if phase.disabled() {
        let _ = button.set_attribute("disabled", "");
    } else {
        let _ = button.remove_attribute("disabled");
    }
    if phase.shows_spinner() {
        button.set_inner_html(SPINNER);
        let _ = button.append_with_str_1(label);
    } else {
        button.set_inner_html(original);
    }
}

fn send(form: &Element, in_flight: Rc<Cell<bool>>, window: &Window, plan: &SendPlan) {
    in_flight.set(true);

    let button = form.query_selector("[type=\"submit\"]").ok().flatten();
    let original = button.as_ref().map(|b| b.inner_html()).unwrap_or_default();
    if let Some(button) = &button {
        show_phase(button, ButtonPhase::Sending, &plan.label, &original);
    }

    let window = window.clone();
    let plan = plan.clone();
    spawn_local(async move {
        TimeoutFuture::new(plan.delay_ms).await;
        if let Some(button) = &button {
            show_phase(button, ButtonPhase::Idle, &plan.label, &original);
        }
        in_flight.set(false);
        info!("Form accepted, continuing to {}", plan.thank_you_url);
        if let Err(e) = window.location().set_href(&plan.thank_you_url) {
            warn!("Could not open confirmation page: {:?}", e);
        }
    });
}

pub fn init(ctx: &Context) -> Result<Option<FormValidation>> {
    let forms = dom::query_all(&ctx.document, ".needs-validation");
    if forms.is_empty() {
        return Ok(None);
    }

    let strings = Rc::new(ctx.config.strings.clone());
    let plan = Rc::new(SendPlan::from_config(&ctx.config));
    let mut listeners = Vec::new();

    for form in forms {
        let fields: Rc<Vec<Rc<Field>>> = Rc::new(
            dom::query_all_in(&form, "input, textarea, select")
                .into_iter()
                .map(|element| {
                    Rc::new(Field {
                        element,
                        state: Cell::new(FieldState::Untouched),
                    })
                })
                .collect(),
        );

        for field in fields.iter() {
            listeners.push(Listener::new(&field.element, "blur", {
                let field = field.clone();
                let strings = strings.clone();
                move |_| {
                    validate(&field, &strings);
                }
            })?);
            listeners.push(Listener::new(&field.element, "input", {
                let field = field.clone();
                let strings = strings.clone();
                move |_| {
                    if field.state.get().revalidates_on_input() {
                        validate(&field, &strings);
                    }
                }
            })?);
        }

        let in_flight = Rc::new(Cell::new(false));
        listeners.push(Listener::new(&form, "submit", {
            let form = form.clone();
            let strings = strings.clone();
            let plan = plan.clone();
            let window = ctx.window.clone();
            move |e: Event| {
                e.prevent_default();
                // Every field is checked so all messages show at once.
                let invalid = fields.iter().filter(|f| !validate(f, &strings)).count();
                match submit_outcome(in_flight.get(), invalid == 0) {
                    SubmitOutcome::Ignored => return,
                    SubmitOutcome::Blocked => {}
                    SubmitOutcome::Sending => send(&form, in_flight.clone(), &window, &plan),
                }
                dom::add_class(&form, "was-validated");
            }
        })?);
    }

    Ok(Some(FormValidation {
        _listeners: listeners,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_form_starts_sending() {
        assert_eq!(submit_outcome(false, true), SubmitOutcome::Sending);
    }

    #[test]
    fn invalid_form_is_blocked() {
        assert_eq!(submit_outcome(false, false), SubmitOutcome::Blocked);
    }

    #[test]
    fn accepted_form_waits_then_goes_to_thank_you_page() {
        let plan = SendPlan::from_config(&SiteConfig::default());
        assert_eq!(plan.delay_ms, 1500);
        assert_eq!(plan.thank_you_url, "thank_you.html");
        assert_eq!(plan.label, SiteConfig::default().strings.sending);
    }

    #[test]
    fn button_is_locked_only_while_sending() {
        assert!(ButtonPhase::Sending.disabled());
        assert!(ButtonPhase::Sending.shows_spinner());
        assert!(!ButtonPhase::Idle.disabled());
        assert!(!ButtonPhase::Idle.shows_spinner());
    }

    #[test]
    fn resubmitting_while_sending_is_ignored() {
        assert_eq!(submit_outcome(true, true), SubmitOutcome::Ignored);
        assert_eq!(submit_outcome(true, false), SubmitOutcome::Ignored);
    }
}
