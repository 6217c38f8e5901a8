//! Per-card import loop driving the deck-building screen.
//!
//! The importer walks the main deck, then the extra deck. For every card it
//! submits a search, validates the rarity icons in the results, opens the
//! accepted result, adds the requested copies and backs out again. Cards that
//! cannot be matched go to the failure ledger; anything that leaves the screen
//! in an unknown state ends the run.

use crate::config::ImporterConfig;
use crate::error::{ImportError, Result};
use crate::ledger::{FailureLedger, SkipReason};
use crate::message_log::{format_elapsed, MessageLog};
use crate::validate::{classify_matches, Verdict};
use decklist_core::{Card, Deck, DeckSection, RarityIndex};
use decklist_cv::device::acquire_frame;
use decklist_cv::{
    Clock, GestureExecutor, LocateRequest, MatchPoint, ScreenSource, TemplateCategory,
    TemplateMatcher, TemplateStore,
};
use std::time::Duration;
use tracing::debug;

/// Icon templates for the fixed controls of the deck-building screen.
pub mod controls {
    pub const OWNED_CARDS: &str = "owned_cards";
    pub const CLEAR_SEARCH: &str = "trash";
    pub const SEARCH_FIELD: &str = "text_search";
    pub const ADD_CARD: &str = "add_card";
    pub const EXIT_CARD: &str = "exit_card";
}

const DIVIDER: &str = "==============================================";

pub struct DeckImporter<S, G, T, C> {
    screen: S,
    gestures: G,
    templates: T,
    clock: C,
    matcher: TemplateMatcher,
    config: ImporterConfig,
    deck: Deck,
    rarities: RarityIndex,
    ledger: FailureLedger,
    log: MessageLog,
    search_text: String,
    display: (u32, u32),
}

impl<S, G, T, C> DeckImporter<S, G, T, C>
where
    S: ScreenSource,
    G: GestureExecutor,
    T: TemplateStore,
    C: Clock,
{
    pub fn new(
        screen: S,
        gestures: G,
        templates: T,
        clock: C,
        deck: Deck,
        rarities: RarityIndex,
        config: ImporterConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ImportError::Configuration(format!("{e:#}")))?;

        Ok(Self {
            screen,
            gestures,
            templates,
            clock,
            matcher: TemplateMatcher::new(config.matcher.clone()),
            config,
            deck,
            rarities,
            ledger: FailureLedger::new(),
            log: MessageLog::default(),
            search_text: String::new(),
            display: (0, 0),
        })
    }

    /// Import the whole deck. Returns how many cards could not be added.
    pub fn run(&mut self) -> Result<usize> {
        self.log = MessageLog::new(self.clock.now());
        self.ledger = FailureLedger::new();

        self.verify_rarities()?;
        self.measure_display()?;
        self.readiness_check()?;

        for section in DeckSection::ALL {
            let cards = self.deck.section(section).to_vec();
            if cards.is_empty() {
                continue;
            }

            self.print(&format!("\n{DIVIDER}\n[INFO] Importing the {section} deck ({} cards)", cards.len()));
            for card in &cards {
                self.import_card(section, card)?;
            }
        }

        self.finish();
        Ok(self.ledger.len())
    }

    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    pub fn messages(&self) -> &[String] {
        self.log.messages()
    }

    /// Name most recently handed to the input service.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Every card needs a known tier before anything is touched.
    fn verify_rarities(&self) -> Result<()> {
        let problems = self.rarities.verify(&self.deck);
        if problems.is_empty() {
            return Ok(());
        }

        let details: Vec<String> = problems.iter().map(|e| e.to_string()).collect();
        Err(ImportError::Configuration(details.join("; ")))
    }

    fn measure_display(&mut self) -> Result<()> {
        let retry = self.config.retry(self.config.attempts.default);
        let mut budget = retry.attempts();
        let frame = acquire_frame(
            &mut self.screen,
            &mut self.gestures,
            &self.clock,
            &mut budget,
            retry.backoff(),
        )?
        .ok_or_else(|| ImportError::ScreenState("no frame could be captured from the screen".to_string()))?;

        self.display = (frame.width(), frame.height());
        debug!(width = frame.width(), height = frame.height(), "Display size");
        Ok(())
    }

    fn readiness_check(&mut self) -> Result<()> {
        let owned = self.find(controls::OWNED_CARDS, self.config.attempts.owned_cards_filter)?;
        if let Some(point) = owned {
            self.print("[INFO] Dismissing the owned cards filter.");
            self.tap(point, controls::OWNED_CARDS, self.config.waits.dismiss_filter_ms)?;
        }

        let Some(trash) = self.find(controls::CLEAR_SEARCH, self.config.attempts.default)? else {
            return Err(ImportError::ScreenState(
                "deck-building screen not detected: search clear control is not visible".to_string(),
            ));
        };
        self.tap(trash, controls::CLEAR_SEARCH, self.config.waits.initial_clear_ms)?;
        self.print("[INFO] Deck-building screen detected.");
        Ok(())
    }

    fn import_card(&mut self, section: DeckSection, card: &Card) -> Result<()> {
        if !self.search_card(section, card)? {
            self.skip(card, SkipReason::SearchFieldNotFound);
            return Ok(());
        }

        match self.validate_results(card)? {
            Verdict::Accept(point) => {
                self.select_and_add(card, point)?;
                self.exit_description()?;
            }
            Verdict::Reject(reason) => {
                self.skip(card, reason);
                self.clear_search()?;
            }
        }
        Ok(())
    }

    /// Focus the search field, let the input service paste the name, then tap
    /// again to submit and drop the keyboard.
    fn search_card(&mut self, section: DeckSection, card: &Card) -> Result<bool> {
        self.search_text = card.name().to_string();
        self.gestures.paste_text(&self.search_text)?;
        self.print(&format!("\n[INFO] Searching {} from the {section} deck.", card.name()));

        let Some(field) = self.find(controls::SEARCH_FIELD, self.config.attempts.default)? else {
            self.print("[WARNING] Search field not found.");
            return Ok(false);
        };

        self.tap(field, controls::SEARCH_FIELD, self.config.waits.focus_search_ms)?;
        self.tap(field, controls::SEARCH_FIELD, self.config.waits.submit_search_ms)?;
        self.print("[INFO] Submitted the search query.");
        Ok(true)
    }

    fn validate_results(&mut self, card: &Card) -> Result<Verdict> {
        let rarity = self.rarities.rarity(card.name())?;
        let icon = self.templates.get(rarity.icon_template(), TemplateCategory::Icon)?;
        let (width, height) = self.display;
        let region = self.config.results_region(width, height);

        let points = self.matcher.locate_all(
            &mut self.screen,
            &mut self.gestures,
            &self.clock,
            &icon,
            Some(region),
            self.config.matcher.thresholds.multi,
        )?;
        debug!(card = card.name(), %rarity, count = points.len(), "Result icons");

        Ok(classify_matches(&points))
    }

    fn select_and_add(&mut self, card: &Card, point: MatchPoint) -> Result<()> {
        self.tap(point, card.name(), self.config.waits.open_card_ms)?;

        let add = self.require(controls::ADD_CARD)?;
        for _ in 0..card.amount() {
            self.tap(add, controls::ADD_CARD, self.config.waits.add_card_ms)?;
        }
        self.print(&format!("[INFO] Added {card}."));
        Ok(())
    }

    fn exit_description(&mut self) -> Result<()> {
        let exit = self.require(controls::EXIT_CARD)?;
        self.tap(exit, controls::EXIT_CARD, self.config.waits.exit_card_ms)?;
        self.clear_search()
    }

    fn clear_search(&mut self) -> Result<()> {
        let trash = self.require(controls::CLEAR_SEARCH)?;
        self.tap(trash, controls::CLEAR_SEARCH, self.config.waits.clear_search_ms)
    }

    fn skip(&mut self, card: &Card, reason: SkipReason) {
        self.print(&format!("[WARNING] Skipping {}: {reason}.", card.name()));
        self.ledger.record(card.name(), reason);
    }

    fn finish(&mut self) {
        if !self.ledger.is_empty() {
            let mut report = format!(
                "\n{DIVIDER}\n[WARNING] {} cards could not be added:",
                self.ledger.len()
            );
            for (name, reason) in self.ledger.iter() {
                report.push_str(&format!("\n  {name}: {reason}"));
            }
            self.print(&report);
        }

        let elapsed = self.log.elapsed(self.clock.now());
        self.print(&format!("\n[INFO] Finished in {}.", format_elapsed(elapsed)));
    }

    /// Locate a control icon within `attempts` frames, at the primary scale only.
    fn find(&mut self, name: &str, attempts: u32) -> Result<Option<MatchPoint>> {
        let template = self.templates.get(name, TemplateCategory::Icon)?;
        let request = LocateRequest::new(self.config.retry(attempts)).single_scale();

        Ok(self.matcher.locate(
            &mut self.screen,
            &mut self.gestures,
            &self.clock,
            &template,
            &request,
        )?)
    }

    /// Locate a control that has to be on screen at this point.
    fn require(&mut self, name: &str) -> Result<MatchPoint> {
        self.find(name, self.config.attempts.controls)?.ok_or_else(|| {
            ImportError::ScreenState(format!("unable to locate the {} control", name.to_uppercase()))
        })
    }

    fn tap(&mut self, point: MatchPoint, label: &str, wait_ms: u64) -> Result<()> {
        self.gestures.tap(point.x, point.y, label, 1)?;
        self.clock.sleep(Duration::from_millis(wait_ms));
        Ok(())
    }

    fn print(&mut self, message: &str) {
        let now = self.clock.now();
        self.log.print(now, message);
    }
}
