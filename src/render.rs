use crate::dom::{escape_html, Document, CARDS_CONTAINER_ID, RESULTS_ID};
use crate::models::{TextRecord, VoteCollection};
use crate::tally::VoteTally;

pub const MAX_CARDS: usize = 3;
pub const NO_VOTES_MESSAGE: &str = "No votes registered yet.";

fn card_markup(record: &TextRecord) -> String {
    format!(
        r#"<article class="card rounded-lg border border-gray-200 p-4 shadow">
<h3 class="card-title text-lg font-semibold">{}</h3>
<p class="card-meta text-sm text-gray-500">{} &middot; {}</p>
<p class="card-content mt-2">{}</p>
</article>"#,
        escape_html(&record.title),
        escape_html(&record.author),
        escape_html(&record.genre),
        escape_html(&record.content),
    )
}

/// Markup for the first [`MAX_CARDS`] records, in input order.
pub fn cards_markup(records: &[TextRecord]) -> String {
    records
        .iter()
        .take(MAX_CARDS)
        .map(card_markup)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces the card container's contents. Does nothing if the document has
/// no card container.
pub fn render_cards(doc: &mut Document, records: &[TextRecord]) -> bool {
    doc.set_inner_html(CARDS_CONTAINER_ID, cards_markup(records))
}

/// Placeholder paragraph when there is nothing to show, a table otherwise.
/// `None` means the votes could not be read.
pub fn tally_markup(votes: Option<&VoteCollection>) -> String {
    let tally = match votes {
        Some(collection) if !collection.is_empty() => VoteTally::from_votes(collection.records()),
        _ => return format!(r#"<p class="text-gray-500">{}</p>"#, NO_VOTES_MESSAGE),
    };

    let mut html = String::from(
        r#"<table class="w-full text-left">
<thead><tr><th>Product</th><th>Total votes</th></tr></thead>
<tbody>
"#,
    );
    for row in tally.rows() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.product_id),
            row.votes
        ));
    }
    html.push_str("</tbody>\n</table>");
    html
}

pub fn render_tally(doc: &mut Document, votes: Option<&VoteCollection>) -> bool {
    doc.set_inner_html(RESULTS_ID, tally_markup(votes))
}
