mod common;

use common::{centre, deck, rarities, templates, DeckScreen, View};
use decklist_cv::SimulatedClock;
use decklist_importer::{DeckImporter, ImportError, ImporterConfig, SkipReason};

const ROW: [(u32, u32); 4] = [(600, 120), (660, 120), (720, 120), (780, 120)];

struct Outcome {
    result: Result<usize, ImportError>,
    messages: Vec<String>,
    ledger: Vec<(String, SkipReason)>,
    search_text: String,
}

fn run(screen: &DeckScreen, main: &[(&str, i64)], extra: &[(&str, i64)]) -> Outcome {
    let templates = templates();
    let clock = SimulatedClock::new();
    let mut importer = DeckImporter::new(
        screen.clone(),
        screen.clone(),
        &templates,
        &clock,
        deck(main, extra),
        rarities(&[("Card A", "SR"), ("Card B", "R"), ("Card C", "UR")]),
        ImporterConfig::default(),
    )
    .expect("default config is valid");

    let result = importer.run();
    Outcome {
        result,
        messages: importer.messages().to_vec(),
        ledger: importer
            .ledger()
            .iter()
            .map(|(name, reason)| (name.to_string(), reason))
            .collect(),
        search_text: importer.search_text().to_string(),
    }
}

#[test]
fn test_imports_single_result_card() {
    let screen = DeckScreen::new().with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 3)], &[]);

    assert_eq!(result.ok(), Some(0));
    assert!(ledger.is_empty());
    assert_eq!(screen.taps_on("add_card"), 3);
    assert_eq!(screen.state().added, vec!["Card A"; 3]);
    assert_eq!(screen.state().view, View::DeckBuilder);
    assert_eq!(screen.state().submitted, None);
}

#[test]
fn test_evenly_spaced_results_open_the_last() {
    let screen = DeckScreen::new().with_results("Card A", "rarity_superrare", &ROW[..3]);

    let Outcome { result, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(0));
    let (x, y) = centre(ROW[2]);
    let state = screen.state();
    let opened: Vec<_> = state.taps.iter().filter(|(label, _, _)| label == "Card A").collect();
    assert_eq!(opened.len(), 1);
    assert_eq!((opened[0].1, opened[0].2), (x, y));
}

#[test]
fn test_no_results_skips_without_opening() {
    let screen = DeckScreen::new();

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 2)], &[]);

    assert_eq!(result.ok(), Some(1));
    assert_eq!(ledger, vec![("Card A".to_string(), SkipReason::NoMatches)]);
    assert_eq!(screen.taps_on("Card A"), 0);
    assert_eq!(screen.taps_on("add_card"), 0);
    // Initial clear plus the clear after the rejection.
    assert_eq!(screen.taps_on("trash"), 2);
}

#[test]
fn test_too_many_results_skips_without_opening() {
    let screen = DeckScreen::new().with_results("Card A", "rarity_superrare", &ROW);

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(1));
    assert_eq!(ledger, vec![("Card A".to_string(), SkipReason::TooManyMatches)]);
    assert_eq!(screen.taps_on("Card A"), 0);
    assert_eq!(screen.state().submitted, None);
}

#[test]
fn test_uneven_spacing_is_rejected() {
    let screen = DeckScreen::new().with_results(
        "Card A",
        "rarity_superrare",
        &[(600, 120), (661, 120), (720, 120)],
    );

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(1));
    assert_eq!(ledger, vec![("Card A".to_string(), SkipReason::XCoordinateAnomaly)]);
}

#[test]
fn test_other_rarity_icons_are_ignored() {
    let screen = DeckScreen::new().with_results("Card A", "rarity_rare", &ROW[..1]);

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(1));
    assert_eq!(ledger, vec![("Card A".to_string(), SkipReason::NoMatches)]);
}

#[test]
fn test_main_deck_then_extra_deck() {
    let screen = DeckScreen::new()
        .with_results("Card A", "rarity_superrare", &ROW[..1])
        .with_results("Card B", "rarity_rare", &ROW[..2])
        .with_results("Card C", "rarity_ultrarare", &ROW[..1]);

    let Outcome { result, messages, .. } = run(&screen, &[("Card B", 2), ("Card A", 1)], &[("Card C", 1)]);

    assert_eq!(result.ok(), Some(0));
    assert_eq!(screen.state().added, vec!["Card B", "Card B", "Card A", "Card C"]);
    assert!(messages.iter().any(|m| m.contains("Searching Card C from the extra deck")));
}

#[test]
fn test_failures_do_not_stop_the_run() {
    let screen = DeckScreen::new().with_results("Card B", "rarity_rare", &ROW[..1]);

    let Outcome { result, messages, ledger, .. } = run(&screen, &[("Card A", 1), ("Card B", 1)], &[]);

    assert_eq!(result.ok(), Some(1));
    assert_eq!(ledger, vec![("Card A".to_string(), SkipReason::NoMatches)]);
    assert_eq!(screen.state().added, vec!["Card B"]);
    let report = messages.iter().find(|m| m.contains("could not be added")).expect("failure report");
    assert!(report.contains("Card A: no matches from the search query"));
}

#[test]
fn test_owned_cards_filter_is_dismissed() {
    let screen = DeckScreen::new()
        .with_owned_filter()
        .with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { result, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(0));
    assert_eq!(screen.taps_on("owned_cards"), 1);
    assert!(!screen.state().owned_filter);
}

#[test]
fn test_missing_landmark_is_fatal() {
    let screen = DeckScreen::new().hiding("trash");

    let Outcome { result, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert!(matches!(result, Err(ImportError::ScreenState(_))));
    assert!(screen.state().taps.is_empty());
}

#[test]
fn test_unknown_rarity_is_fatal_before_any_gesture() {
    let screen = DeckScreen::new()
        .with_results("Card A", "rarity_superrare", &ROW[..1])
        .with_results("Card Z", "rarity_superrare", &ROW[..1]);

    let Outcome { result, .. } = run(&screen, &[("Card A", 1), ("Card Z", 1)], &[]);

    assert!(matches!(result, Err(ImportError::Configuration(ref msg)) if msg.contains("Card Z")));
    let state = screen.state();
    assert!(state.taps.is_empty());
    assert_eq!(state.swipes, 0);
    assert_eq!(state.captures, 0);
    assert!(state.added.is_empty());
}

#[test]
fn test_missing_search_field_skips_every_card() {
    let screen = DeckScreen::new()
        .hiding("text_search")
        .with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 1), ("Card B", 2)], &[]);

    assert_eq!(result.ok(), Some(2));
    assert_eq!(
        ledger,
        vec![
            ("Card A".to_string(), SkipReason::SearchFieldNotFound),
            ("Card B".to_string(), SkipReason::SearchFieldNotFound),
        ]
    );
    assert_eq!(screen.taps_on("text_search"), 0);
    assert!(screen.state().added.is_empty());
    // Only the initial clear.
    assert_eq!(screen.taps_on("trash"), 1);
}

#[test]
fn test_missing_add_control_is_fatal() {
    let screen = DeckScreen::new()
        .hiding("add_card")
        .with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { result, .. } = run(&screen, &[("Card A", 3)], &[]);

    assert!(matches!(result, Err(ImportError::ScreenState(ref msg)) if msg.contains("ADD_CARD")));
    assert_eq!(screen.taps_on("Card A"), 1);
    assert_eq!(screen.taps_on("add_card"), 0);
    assert!(screen.state().added.is_empty());
}

#[test]
fn test_missing_exit_control_is_fatal() {
    let screen = DeckScreen::new()
        .hiding("exit_card")
        .with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { result, .. } = run(&screen, &[("Card A", 2)], &[]);

    assert!(matches!(result, Err(ImportError::ScreenState(ref msg)) if msg.contains("EXIT_CARD")));
    assert_eq!(screen.state().added, vec!["Card A"; 2]);
    assert!(matches!(screen.state().view, View::CardDetail(_)));
}

#[test]
fn test_results_on_two_rows_are_rejected() {
    let screen = DeckScreen::new().with_results(
        "Card A",
        "rarity_superrare",
        &[(600, 100), (660, 130)],
    );

    let Outcome { result, ledger, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(1));
    assert_eq!(ledger, vec![("Card A".to_string(), SkipReason::YCoordinateAnomaly)]);
    assert_eq!(screen.taps_on("Card A"), 0);
    assert_eq!(screen.state().submitted, None);
    assert_eq!(screen.taps_on("trash"), 2);
}

#[test]
fn test_search_text_follows_the_current_card() {
    let screen = DeckScreen::new()
        .with_results("Card A", "rarity_superrare", &ROW[..1])
        .with_results("Card C", "rarity_ultrarare", &ROW[..1]);

    let Outcome { result, search_text, .. } = run(&screen, &[("Card A", 1)], &[("Card C", 1)]);

    assert_eq!(result.ok(), Some(0));
    assert_eq!(search_text, "Card C");
    assert_eq!(screen.state().pasted, "Card C");
}

#[test]
fn test_blank_frames_are_nudged_away() {
    let screen = DeckScreen::new()
        .with_blank_captures(2)
        .with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { result, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert_eq!(result.ok(), Some(0));
    assert_eq!(screen.state().swipes, 4);
}

#[test]
fn test_no_frames_at_all_is_fatal() {
    let screen = DeckScreen::new().with_blank_captures(u32::MAX);

    let Outcome { result, .. } = run(&screen, &[("Card A", 1)], &[]);

    assert!(matches!(result, Err(ImportError::ScreenState(_))));
    assert_eq!(screen.state().captures, 5);
}

#[test]
fn test_messages_are_timestamped() {
    let screen = DeckScreen::new().with_results("Card A", "rarity_superrare", &ROW[..1]);

    let Outcome { messages, .. } = run(&screen, &[("Card A", 1)], &[]);

    let search = messages
        .iter()
        .find(|m| m.contains("Searching Card A"))
        .expect("search message");
    assert!(search.starts_with('\n'));
    let stamp = &search[1..9];
    assert_eq!(stamp.len(), 8);
    assert_eq!(&stamp[2..3], ":");
    assert!(messages.last().is_some_and(|m| m.contains("Finished in")));
}
