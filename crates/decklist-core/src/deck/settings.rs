//! Decklist loading from the importer's `settings.json`.
//!
//! The file is written by the external import pipeline:
//!
//! ```json
//! { "deck": { "main": [ { "card": { "name": "..." }, "amount": 3 } ], "extra": [] } }
//! ```

use super::card::{Card, Deck};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SettingsFile {
    deck: DeckEntries,
}

#[derive(Debug, Default, Deserialize)]
struct DeckEntries {
    #[serde(default)]
    main: Vec<DeckEntry>,
    #[serde(default)]
    extra: Vec<DeckEntry>,
}

#[derive(Debug, Deserialize)]
struct DeckEntry {
    card: CardName,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct CardName {
    name: String,
}

impl Deck {
    /// Load the deck lists from a settings file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Deck> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        Self::from_settings_json(&content)
            .with_context(|| format!("Invalid decklist in settings file: {:?}", path))
    }

    /// Parse the deck lists out of a settings document, keeping entry order.
    pub fn from_settings_json(json: &str) -> Result<Deck> {
        let settings: SettingsFile =
            serde_json::from_str(json).context("Failed to parse settings JSON")?;

        let main = convert_entries(settings.deck.main, "main")?;
        let extra = convert_entries(settings.deck.extra, "extra")?;

        Ok(Deck::new(main, extra))
    }
}

fn convert_entries(entries: Vec<DeckEntry>, section: &str) -> Result<Vec<Card>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Card::new(entry.card.name, entry.amount)
                .with_context(|| format!("{} deck entry {}", section, index + 1))
        })
        .collect()
}
