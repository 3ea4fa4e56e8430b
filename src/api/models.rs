use serde::{Deserialize, Serialize};

use crate::tally::TallyRow;

/// Urlencoded body of the voting form.
#[derive(Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub product: Option<String>,
}

impl VoteForm {
    /// The selected product, if one was chosen.
    pub fn selected(&self) -> Option<&str> {
        self.product
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "productID")]
    pub product_id: String,
}

#[derive(Serialize)]
pub struct TallyResponse {
    pub rows: Vec<TallyRow>,
    pub total: u64,
}
