use crate::dom::{self, VisibilityObserver};
use crate::enhancer::Context;
use crate::error::Result;
use crate::styles;

const REVEAL_TARGETS: &str = ".card, .c-card, section, .accordion-item";
const VISIBLE_SHARE: f64 = 0.1;
// Shrinks the viewport bottom so elements reveal a little after they appear.
const ROOT_MARGIN: &str = "0px 0px -50px 0px";

pub fn init(ctx: &Context) -> Result<Option<VisibilityObserver>> {
    // Without an observer nothing could reveal them again, so leave them visible.
    if !dom::supports(&ctx.window, "IntersectionObserver") {
        return Ok(None);
    }
    let targets = dom::query_all(&ctx.document, REVEAL_TARGETS);
    if targets.is_empty() {
        return Ok(None);
    }

    let observer = VisibilityObserver::once(VISIBLE_SHARE, Some(ROOT_MARGIN), |element| {
        dom::add_class(&element, styles::REVEALED);
    })?;
    for element in &targets {
        dom::add_class(element, styles::REVEAL);
        observer.observe(element);
    }
    Ok(Some(observer))
}
