//! Automated deck import for a card game's deck-building screen.
//!
//! Drives the screen through the narrow device traits of `decklist_cv`:
//! searches each decklist entry, picks the right print by its rarity icon and
//! adds the requested copies.

pub mod config;
pub mod error;
pub mod importer;
pub mod ledger;
pub mod message_log;
pub mod validate;

pub use config::{AttemptBudgets, ImporterConfig, Waits};
pub use error::{ImportError, Result};
pub use importer::DeckImporter;
pub use ledger::{FailureLedger, SkipReason};
pub use message_log::MessageLog;
pub use validate::{classify_matches, Verdict};
