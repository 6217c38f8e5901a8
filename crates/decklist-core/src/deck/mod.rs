pub mod card;
pub mod settings;

pub use card::{Card, Deck, DeckError, DeckSection};
