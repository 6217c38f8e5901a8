//! Deck and rarity data consumed by the decklist importer.
//!
//! Everything in this crate is read-only once loaded: the deck lists keep the
//! order they were supplied in and the rarity index is never mutated during a
//! run.

pub mod deck;
pub mod rarity;

pub use deck::{Card, Deck, DeckError, DeckSection};
pub use rarity::{Rarity, RarityError, RarityIndex};
