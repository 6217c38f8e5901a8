//! Card rarity tiers and the name → tier index.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::deck::Deck;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RarityError {
    #[error("card '{0}' is missing from the rarity index")]
    UnknownCard(String),
    #[error("invalid rarity name of '{tier}' for card '{card}'")]
    UnknownTier { card: String, tier: String },
}

/// Print rarity of a card. Each tier has its own icon on the search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Normal,
    Rare,
    SuperRare,
    UltraRare,
}

impl Rarity {
    /// Short tier code as used by the card database.
    pub fn code(&self) -> &'static str {
        match self {
            Rarity::Normal => "N",
            Rarity::Rare => "R",
            Rarity::SuperRare => "SR",
            Rarity::UltraRare => "UR",
        }
    }

    /// Name of the icon template marking this tier in the search results.
    pub fn icon_template(&self) -> &'static str {
        match self {
            Rarity::Normal => "rarity_normal",
            Rarity::Rare => "rarity_rare",
            Rarity::SuperRare => "rarity_superrare",
            Rarity::UltraRare => "rarity_ultrarare",
        }
    }
}

impl FromStr for Rarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Rarity::Normal),
            "R" => Ok(Rarity::Rare),
            "SR" => Ok(Rarity::SuperRare),
            "UR" => Ok(Rarity::UltraRare),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mapping from card name to its raw tier code.
///
/// Tier codes are kept as supplied and only parsed on lookup, so a bad entry
/// surfaces as an error for the card that needs it rather than failing the
/// whole index.
#[derive(Debug, Clone, Default)]
pub struct RarityIndex {
    tiers: HashMap<String, String>,
}

impl RarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, tier: impl Into<String>) {
        self.tiers.insert(name.into(), tier.into());
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Resolve the rarity of a card.
    pub fn rarity(&self, name: &str) -> Result<Rarity, RarityError> {
        let tier = self
            .tiers
            .get(name)
            .ok_or_else(|| RarityError::UnknownCard(name.to_string()))?;

        tier.parse().map_err(|_| RarityError::UnknownTier {
            card: name.to_string(),
            tier: tier.clone(),
        })
    }

    /// Every card of the deck that does not resolve to a known tier.
    pub fn verify(&self, deck: &Deck) -> Vec<RarityError> {
        deck.cards()
            .filter_map(|(_, card)| self.rarity(card.name()).err())
            .collect()
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for RarityIndex {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut index = RarityIndex::new();
        for (name, tier) in iter {
            index.insert(name, tier);
        }
        index
    }
}
