//! Loading the rarity index from the card database dump (`cards.json`).

use super::RarityIndex;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CardRecord {
    name: String,
    rarity: Option<String>,
}

impl RarityIndex {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RarityIndex> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read card list: {:?}", path))?;

        Self::from_cards_json(&content)
            .with_context(|| format!("Invalid card list: {:?}", path))
    }

    /// Build the index from a JSON array of card records.
    ///
    /// Records without a rarity are cards not yet released in the client and
    /// are left out.
    pub fn from_cards_json(json: &str) -> Result<RarityIndex> {
        let records: Vec<CardRecord> =
            serde_json::from_str(json).context("Failed to parse card list JSON")?;

        Ok(records
            .into_iter()
            .filter_map(|record| record.rarity.map(|rarity| (record.name, rarity)))
            .collect())
    }
}
