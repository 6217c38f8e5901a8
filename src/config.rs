use anyhow::{Context, Result};
use decklist_cv::{MatchConfig, Region, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Fixed pauses after each gesture, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Waits {
    pub dismiss_filter_ms: u64,
    pub initial_clear_ms: u64,
    pub focus_search_ms: u64,
    pub submit_search_ms: u64,
    pub open_card_ms: u64,
    pub add_card_ms: u64,
    pub exit_card_ms: u64,
    pub clear_search_ms: u64,
}

impl Default for Waits {
    fn default() -> Self {
        Self {
            dismiss_filter_ms: 100,
            initial_clear_ms: 1000,
            focus_search_ms: 1000,
            submit_search_ms: 2000,
            open_card_ms: 250,
            add_card_ms: 250,
            exit_card_ms: 250,
            clear_search_ms: 250,
        }
    }
}

/// How many frames each kind of lookup may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttemptBudgets {
    pub default: u32,
    /// Add, exit and clear controls, which must appear.
    pub controls: u32,
    pub owned_cards_filter: u32,
}

impl Default for AttemptBudgets {
    fn default() -> Self {
        Self {
            default: 5,
            controls: 30,
            owned_cards_filter: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    pub matcher: MatchConfig,
    pub waits: Waits,
    pub attempts: AttemptBudgets,
    /// Pause between failed lookups.
    pub retry_backoff_ms: u64,
    /// Where rarity icons are searched. Defaults to the right half of the screen.
    pub results_region: Option<Region>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            matcher: MatchConfig::default(),
            waits: Waits::default(),
            attempts: AttemptBudgets::default(),
            retry_backoff_ms: 500,
            results_region: None,
        }
    }
}

impl ImporterConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_json(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ImporterConfig = serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.matcher.validate()
    }

    /// Search area for result icons on a `width` x `height` screen.
    pub fn results_region(&self, width: u32, height: u32) -> Region {
        self.results_region
            .unwrap_or_else(|| Region::right_half(width, height))
    }

    /// Retry policy with the shared backoff and the given attempt budget.
    pub fn retry(&self, attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(self.retry_backoff_ms))
    }
}
