use std::collections::HashMap;

use serde::Serialize;

use crate::models::VoteRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyRow {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub votes: u64,
}

/// Vote counts per product, rows in the order each product was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoteTally {
    rows: Vec<TallyRow>,
}

impl VoteTally {
    pub fn from_votes<'a, I>(votes: I) -> Self
    where
        I: IntoIterator<Item = &'a VoteRecord>,
    {
        let mut rows: Vec<TallyRow> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for vote in votes {
            match index.get(vote.product_id.as_str()) {
                Some(&i) => rows[i].votes += 1,
                None => {
                    index.insert(vote.product_id.as_str(), rows.len());
                    rows.push(TallyRow {
                        product_id: vote.product_id.clone(),
                        votes: 1,
                    });
                }
            }
        }

        VoteTally { rows }
    }

    pub fn rows(&self) -> &[TallyRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[cfg(test)]
    pub fn count(&self, product_id: &str) -> u64 {
        self.rows
            .iter()
            .find(|row| row.product_id == product_id)
            .map_or(0, |row| row.votes)
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.votes).sum()
    }
}
