use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("card '{name}' has an invalid amount of {amount} (expected at least 1)")]
    InvalidAmount { name: String, amount: i64 },
}

/// A single decklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    name: String,
    amount: u32,
}

impl Card {
    pub fn new(name: impl Into<String>, amount: i64) -> Result<Self, DeckError> {
        let name = name.into();
        if amount < 1 || amount > u32::MAX as i64 {
            return Err(DeckError::InvalidAmount { name, amount });
        }

        Ok(Self {
            name,
            amount: amount as u32,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.amount, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckSection {
    Main,
    Extra,
}

impl DeckSection {
    /// Sections in the order they are imported.
    pub const ALL: [DeckSection; 2] = [DeckSection::Main, DeckSection::Extra];
}

impl fmt::Display for DeckSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckSection::Main => write!(f, "main"),
            DeckSection::Extra => write!(f, "extra"),
        }
    }
}

/// The two ordered card sequences of a decklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deck {
    pub main: Vec<Card>,
    pub extra: Vec<Card>,
}

impl Deck {
    pub fn new(main: Vec<Card>, extra: Vec<Card>) -> Self {
        Self { main, extra }
    }

    pub fn section(&self, section: DeckSection) -> &[Card] {
        match section {
            DeckSection::Main => &self.main,
            DeckSection::Extra => &self.extra,
        }
    }

    /// All cards, main deck first, in iteration order.
    pub fn cards(&self) -> impl Iterator<Item = (DeckSection, &Card)> {
        DeckSection::ALL
            .into_iter()
            .flat_map(move |section| self.section(section).iter().map(move |card| (section, card)))
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
