//! Plain-text rendering of view events and screen snapshots.

use shopscout_core::events::ViewEvent;
use shopscout_core::types::{ChatRole, ChatTurn, FilterState, Product};
use shopscout_session::ResultsView;

/// Specification fragments shown per product card.
const CARD_HIGHLIGHTS: usize = 4;

pub fn product_line(rank: usize, product: &Product) -> String {
    let mut line = format!(
        "{:>2}. {} [{}] Rs {:.0}  {:.1}*",
        rank + 1,
        product.product_name,
        product.category,
        product.price,
        product.rating
    );
    let highlights = product.highlights(CARD_HIGHLIGHTS);
    if !highlights.is_empty() {
        line.push_str("\n      ");
        line.push_str(&highlights.join(" | "));
    }
    line
}

pub fn results(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products match.".to_string();
    }
    let mut out = format!("Top pick: {}", products[0].product_name);
    for (rank, product) in products.iter().enumerate() {
        out.push('\n');
        out.push_str(&product_line(rank, product));
    }
    out
}

pub fn turn(turn: &ChatTurn) -> String {
    let speaker = match turn.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
    };
    let mut line = format!("[{}] {}", speaker, turn.text);
    if let Some(ref product) = turn.recommended {
        line.push_str(&format!("\n      -> {} (Rs {:.0})", product.product_name, product.price));
    }
    line
}

pub fn filters(filters: &FilterState, committed: &str) -> String {
    format!(
        "query: {:?} (committed {:?})  category: {}  price: {}..{}",
        filters.query, committed, filters.category, filters.price.min, filters.price.max
    )
}

/// Text for a sink event, or `None` for events that have no visible effect.
pub fn event(event: &ViewEvent) -> Option<String> {
    match event {
        ViewEvent::ResultsReplaced { products, .. } => Some(results(products)),
        ViewEvent::ResultsCleared => Some("(results cleared)".to_string()),
        ViewEvent::SearchLoading { loading: true } => Some("searching...".to_string()),
        ViewEvent::TurnAppended { turn: t } => Some(turn(t)),
        ViewEvent::ChatPending { pending: true } => Some("assistant is typing...".to_string()),
        _ => None,
    }
}

pub fn snapshot(
    filter_state: &FilterState,
    committed: &str,
    view: &ResultsView,
    transcript: &[ChatTurn],
) -> String {
    let mut out = filters(filter_state, committed);
    if view.loading {
        out.push_str("\nsearching...");
    }
    out.push('\n');
    out.push_str(&results(&view.products));
    out.push_str("\n--- chat ---");
    for t in transcript {
        out.push('\n');
        out.push_str(&turn(t));
    }
    out
}
