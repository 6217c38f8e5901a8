//! Simulated deck-building screen for driving the importer end to end.
#![allow(dead_code)]

use decklist_core::{Card, Deck, RarityIndex};
use decklist_cv::{GestureExecutor, ScreenSource, TemplateCategory, TemplateSet};
use image::{imageops, DynamicImage, GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// 1080 pixels wide, so templates are matched at their native size.
pub const SCREEN_WIDTH: u32 = 1080;
pub const SCREEN_HEIGHT: u32 = 200;
pub const ICON_SIZE: u32 = 24;

pub const OWNED_CARDS_AT: (u32, u32) = (40, 20);
pub const SEARCH_FIELD_AT: (u32, u32) = (200, 20);
pub const TRASH_AT: (u32, u32) = (900, 20);
pub const ADD_CARD_AT: (u32, u32) = (300, 120);
pub const EXIT_CARD_AT: (u32, u32) = (100, 120);

const ICONS: [(&str, u64); 9] = [
    ("owned_cards", 1),
    ("trash", 2),
    ("text_search", 3),
    ("add_card", 4),
    ("exit_card", 5),
    ("rarity_normal", 6),
    ("rarity_rare", 7),
    ("rarity_superrare", 8),
    ("rarity_ultrarare", 9),
];

/// Black/white noise patch; distinct seeds give uncorrelated patches.
pub fn noise_icon(seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(ICON_SIZE, ICON_SIZE, |_, _| {
        Luma([if rng.gen_bool(0.5) { 255 } else { 0 }])
    })
}

pub fn templates() -> TemplateSet {
    ICONS.iter().fold(TemplateSet::new(), |set, &(name, seed)| {
        set.with_template(name, TemplateCategory::Icon, noise_icon(seed))
    })
}

pub fn icon(name: &str) -> GrayImage {
    let seed = ICONS
        .iter()
        .find(|(icon, _)| *icon == name)
        .map(|(_, seed)| *seed)
        .unwrap_or_else(|| panic!("unknown icon {name}"));
    noise_icon(seed)
}

/// Centre of an icon drawn with its top-left corner at `at`.
pub fn centre(at: (u32, u32)) -> (u32, u32) {
    (at.0 + ICON_SIZE / 2, at.1 + ICON_SIZE / 2)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    DeckBuilder,
    CardDetail(String),
}

#[derive(Debug)]
pub struct ScreenState {
    pub view: View,
    pub owned_filter: bool,
    /// Controls that never appear on screen.
    pub hidden: HashSet<String>,
    pub search_focused: bool,
    pub pasted: String,
    pub typed: String,
    pub submitted: Option<String>,
    /// Result icons per query: icon name and top-left corner.
    pub catalog: HashMap<String, Vec<(String, (u32, u32))>>,
    pub added: Vec<String>,
    pub taps: Vec<(String, u32, u32)>,
    pub swipes: u32,
    pub blank_captures: u32,
    pub captures: u32,
}

/// Deck-building screen shared between the capture and gesture handles.
#[derive(Debug, Clone)]
pub struct DeckScreen(Rc<RefCell<ScreenState>>);

impl DeckScreen {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ScreenState {
            view: View::DeckBuilder,
            owned_filter: false,
            hidden: HashSet::new(),
            search_focused: false,
            pasted: String::new(),
            typed: String::new(),
            submitted: None,
            catalog: HashMap::new(),
            added: Vec::new(),
            taps: Vec::new(),
            swipes: 0,
            blank_captures: 0,
            captures: 0,
        })))
    }

    /// Searching `name` shows `icon` at each of `positions`.
    pub fn with_results(self, name: &str, icon: &str, positions: &[(u32, u32)]) -> Self {
        self.0.borrow_mut().catalog.insert(
            name.to_string(),
            positions.iter().map(|&at| (icon.to_string(), at)).collect(),
        );
        self
    }

    pub fn with_owned_filter(self) -> Self {
        self.0.borrow_mut().owned_filter = true;
        self
    }

    /// Never draw the `name` control.
    pub fn hiding(self, name: &str) -> Self {
        self.0.borrow_mut().hidden.insert(name.to_string());
        self
    }

    /// The next `count` captures return nothing.
    pub fn with_blank_captures(self, count: u32) -> Self {
        self.0.borrow_mut().blank_captures = count;
        self
    }

    pub fn state(&self) -> std::cell::Ref<'_, ScreenState> {
        self.0.borrow()
    }

    pub fn taps_on(&self, label: &str) -> usize {
        self.state().taps.iter().filter(|(tapped, _, _)| tapped == label).count()
    }

    fn visible(&self) -> Vec<(String, (u32, u32))> {
        let state = self.0.borrow();
        let mut icons = Vec::new();

        match &state.view {
            View::DeckBuilder => {
                if state.owned_filter {
                    icons.push(("owned_cards".to_string(), OWNED_CARDS_AT));
                }
                icons.push(("text_search".to_string(), SEARCH_FIELD_AT));
                icons.push(("trash".to_string(), TRASH_AT));
                if let Some(results) = state.submitted.as_ref().and_then(|q| state.catalog.get(q)) {
                    icons.extend(results.iter().cloned());
                }
            }
            View::CardDetail(_) => {
                icons.push(("add_card".to_string(), ADD_CARD_AT));
                icons.push(("exit_card".to_string(), EXIT_CARD_AT));
            }
        }

        icons.retain(|(name, _)| !state.hidden.contains(name));
        icons
    }

    fn render(&self) -> GrayImage {
        let mut frame = GrayImage::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        for (name, at) in self.visible() {
            imageops::replace(&mut frame, &icon(&name), at.0 as i64, at.1 as i64);
        }
        frame
    }
}

impl ScreenSource for DeckScreen {
    fn capture(&mut self) -> Option<DynamicImage> {
        {
            let mut state = self.0.borrow_mut();
            state.captures += 1;
            if state.blank_captures > 0 {
                state.blank_captures -= 1;
                return None;
            }
        }
        Some(DynamicImage::ImageLuma8(self.render()))
    }
}

impl GestureExecutor for DeckScreen {
    fn tap(&mut self, x: u32, y: u32, label: &str, repeat: u32) -> anyhow::Result<()> {
        let hit = self.visible().into_iter().find(|(_, at)| {
            (at.0..at.0 + ICON_SIZE).contains(&x) && (at.1..at.1 + ICON_SIZE).contains(&y)
        });

        let mut guard = self.0.borrow_mut();
        let state = &mut *guard;
        for _ in 0..repeat.max(1) {
            state.taps.push((label.to_string(), x, y));

            let Some((name, _)) = &hit else { continue };
            match name.as_str() {
                "owned_cards" => state.owned_filter = false,
                "trash" => {
                    state.submitted = None;
                    state.typed.clear();
                }
                "text_search" if state.search_focused => {
                    state.submitted = Some(state.typed.clone());
                    state.search_focused = false;
                }
                "text_search" => {
                    state.typed = state.pasted.clone();
                    state.search_focused = true;
                }
                "add_card" => {
                    if let View::CardDetail(card) = &state.view {
                        state.added.push(card.clone());
                    }
                }
                "exit_card" => state.view = View::DeckBuilder,
                icon if icon.starts_with("rarity_") => {
                    let card = state.submitted.clone().unwrap_or_default();
                    state.view = View::CardDetail(card);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn swipe(&mut self, _from: (u32, u32), _to: (u32, u32), _duration_ms: u64) -> anyhow::Result<()> {
        self.0.borrow_mut().swipes += 1;
        Ok(())
    }

    fn paste_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.0.borrow_mut().pasted = text.to_string();
        Ok(())
    }
}

pub fn deck(main: &[(&str, i64)], extra: &[(&str, i64)]) -> Deck {
    let cards = |entries: &[(&str, i64)]| -> Vec<Card> {
        entries
            .iter()
            .map(|&(name, amount)| Card::new(name, amount).expect("valid card"))
            .collect()
    };
    Deck::new(cards(main), cards(extra))
}

pub fn rarities(entries: &[(&str, &str)]) -> RarityIndex {
    entries.iter().copied().collect()
}
