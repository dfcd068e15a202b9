use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::styles;

/// Arms the hover transition the first time the pointer enters a card.
pub fn init(ctx: &Context) -> Result<Option<Vec<Listener>>> {
    let cards = dom::query_all(&ctx.document, ".card, .c-card, a.card");
    if cards.is_empty() {
        return Ok(None);
    }
    cards
        .into_iter()
        .map(|card| {
            let target = card.clone();
            Listener::new(&card, "mouseenter", move |_| {
                dom::add_class(&target, styles::HOVER_ARMED)
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
