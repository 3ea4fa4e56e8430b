use crate::config::Config;
use crate::dom::{
    escape_html, js_string, Document, Element, CARDS_CONTAINER_ID, PRODUCT_SELECT_ID, RESULTS_ID,
    TOAST_ID, VIDEO_BUTTON_ID, VOTING_FORM_ID,
};
use crate::fetcher::fetch_json;
use crate::models::TextRecord;
use crate::render::{render_cards, render_tally};
use crate::AppState;

pub const PRODUCT_FIELD: &str = "product";
pub const VOTE_FORM_PATH: &str = "/votes";
pub const VOTE_API_PATH: &str = "/api/votes";
pub const RESULTS_FRAGMENT_PATH: &str = "/fragments/results";

/// Client-side part of the startup sequence: welcome alert, toast reveal
/// timer, video click handler, then the submit handler. A submit posts the
/// vote, resets the form and swaps in a fresh tally without reloading the
/// page; the form's own `action` only matters when scripts are off.
pub fn bootstrap_script(config: &Config) -> String {
    format!(
        r#"<script>
"use strict";
(() => {{
    alert({welcome});
    console.log("Welcome message shown.");

    const toast = document.getElementById("{toast}");
    if (toast) {{
        setTimeout(() => {{ toast.classList.add("md:block"); }}, {delay});
    }}

    const demo = document.getElementById("{demo}");
    if (demo) {{
        demo.addEventListener("click", () => {{
            window.open({video}, "_blank");
        }});
    }}

    const form = document.getElementById("{form}");
    const select = document.getElementById("{select}");
    const results = document.getElementById("{results}");
    if (form && select) {{
        form.addEventListener("submit", async (event) => {{
            event.preventDefault();
            const productID = select.value;
            if (!productID) {{
                console.log("No product selected, vote not sent.");
                return;
            }}

            try {{
                const response = await fetch("{vote_api}", {{
                    method: "POST",
                    headers: {{ "Content-Type": "application/json" }},
                    body: JSON.stringify({{ productID }}),
                }});
                if (!response.ok) {{
                    console.error("Vote was not recorded:", response.status);
                }}
            }} catch (error) {{
                console.error("Vote request failed:", error);
            }}
            form.reset();

            if (results) {{
                try {{
                    const tally = await fetch("{fragment}");
                    if (tally.ok) {{
                        results.innerHTML = await tally.text();
                    }}
                }} catch (error) {{
                    console.error("Could not refresh votes:", error);
                }}
            }}
        }});
    }}
}})();
</script>"#,
        welcome = js_string(&config.welcome_message),
        toast = TOAST_ID,
        delay = config.toast_delay.as_millis(),
        demo = VIDEO_BUTTON_ID,
        video = js_string(&config.video_url),
        form = VOTING_FORM_ID,
        select = PRODUCT_SELECT_ID,
        results = RESULTS_ID,
        vote_api = VOTE_API_PATH,
        fragment = RESULTS_FRAGMENT_PATH,
    )
}

fn skeleton_cards() -> String {
    let skeleton = r#"<div class="skeleton animate-pulse rounded-lg bg-gray-200 h-32"></div>"#;
    vec![skeleton; 3].join("\n")
}

fn product_options(products: &[String]) -> String {
    let mut html = String::from(r#"<option value="">Select a product</option>"#);
    for product in products {
        let product = escape_html(product);
        html.push_str(&format!(r#"<option value="{0}">{0}</option>"#, product));
    }
    html
}

/// The page before any data is loaded: toast, video button, card skeletons,
/// voting form and an empty results area.
pub fn landing_document(config: &Config) -> Document {
    let mut doc = Document::new("Products");
    doc.push_head(r#"<script src="https://cdn.tailwindcss.com"></script>"#);

    doc.push_element(
        Element::new("div", TOAST_ID)
            .attr("class", "hidden fixed bottom-4 right-4 rounded-lg bg-white p-4 shadow")
            .attr("role", "alert")
            .inner("<p>New video available. Take a look!</p>"),
    );
    doc.push_markup(r#"<header class="p-6"><h1 class="text-3xl font-bold">Our products</h1></header>"#);
    doc.push_element(
        Element::new("button", VIDEO_BUTTON_ID)
            .attr("type", "button")
            .attr("class", "rounded bg-blue-600 px-4 py-2 text-white")
            .inner("Watch the video"),
    );
    doc.push_element(
        Element::new("div", CARDS_CONTAINER_ID)
            .attr("class", "grid gap-4 md:grid-cols-3 p-6")
            .inner(skeleton_cards()),
    );

    let form = format!(
        r#"<label for="{select}">Vote for your favourite product</label>
<select id="{select}" name="{field}">{options}</select>
<button type="submit">Vote</button>"#,
        select = PRODUCT_SELECT_ID,
        field = PRODUCT_FIELD,
        options = product_options(&config.products),
    );
    doc.push_element(
        Element::new("form", VOTING_FORM_ID)
            .attr("method", "post")
            .attr("action", VOTE_FORM_PATH)
            .attr("class", "p-6")
            .inner(form),
    );
    doc.push_element(Element::new("div", RESULTS_ID).attr("class", "p-6"));

    doc.push_markup(bootstrap_script(config));
    doc
}

/// Fetches the demo texts. Failures are logged and yield `None`.
pub async fn load_texts(url: &str) -> Option<Vec<TextRecord>> {
    let result = fetch_json(url).await;
    match result.texts() {
        Ok(texts) => {
            tracing::debug!(count = texts.len(), "loaded demo texts");
            Some(texts)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load demo texts, keeping skeletons");
            None
        }
    }
}

/// Assembles the full page. The text load and the vote read are independent
/// and run concurrently.
pub async fn render_page(state: &AppState) -> String {
    let mut doc = landing_document(&state.config);

    let (texts, votes) = tokio::join!(load_texts(&state.config.texts_url), state.store.get_votes());

    if let Some(texts) = texts {
        render_cards(&mut doc, &texts);
    }

    let votes = match votes {
        Ok(votes) => Some(votes),
        Err(e) => {
            tracing::error!(error = %e, "could not read votes");
            None
        }
    };
    render_tally(&mut doc, votes.as_ref());

    doc.to_html()
}
