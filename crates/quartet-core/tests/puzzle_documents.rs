//! Document-level tests: JSON shapes accepted by the puzzle loader and the
//! reducer walk-through for a full solve.

use std::sync::Arc;

use quartet_core::{
    CategoryColor, GameAction, GameState, GameStatus, PendingSolve, Puzzle, PuzzleError,
    WordId, game_reducer, ordered_categories,
};

const DOCUMENT: &str = r#"{
  "date": "2024-10-07",
  "categories": [
    {"id": "things-with-blades", "title": "Things with blades", "color": "purple",
     "words": ["FAN", "SAW", "SWORD", "KNIFE"]},
    {"id": "social-groups", "title": "Assemblies of people", "color": "blue",
     "words": ["PACK", "CLUB", "BAND", "SET"]},
    {"id": "cooking-verbs", "title": "Cooking actions", "color": "yellow",
     "words": ["BAKE", "BOIL", "CHOP", "STIR"]},
    {"id": "kinds-of-house", "title": "Words before \"house\"", "color": "green",
     "words": ["TREE", "DOG", "WARE", "LIGHT"]}
  ]
}"#;

fn with_extra(extra: &str) -> String {
    DOCUMENT.replacen("\"date\"", &format!("{extra}, \"date\""), 1)
}

#[test]
fn cards_follow_declaration_order_without_start_grid() {
    let puzzle = Puzzle::from_json_str(DOCUMENT).unwrap();
    let labels: Vec<&str> = puzzle
        .starting_cards()
        .iter()
        .map(|card| card.label.as_str())
        .collect();
    assert_eq!(&labels[..4], ["FAN", "SAW", "SWORD", "KNIFE"]);
    assert_eq!(labels.len(), 16);
    assert_eq!(puzzle.mistakes_allowed(), None);
}

#[test]
fn starting_order_alias_is_accepted() {
    let json = with_extra(r#""starting order": ["STIR", "DOG"]"#);
    let puzzle = Puzzle::from_json_str(&json).unwrap();
    let first: Vec<&str> = puzzle
        .starting_cards()
        .iter()
        .take(3)
        .map(|card| card.label.as_str())
        .collect();
    assert_eq!(first, ["STIR", "DOG", "FAN"]);
}

#[test]
fn camel_case_start_grid_is_accepted() {
    let json = with_extra(r#""startGrid": ["KNIFE"], "mistakesAllowed": 3"#);
    let puzzle = Puzzle::from_json_str(&json).unwrap();
    assert_eq!(puzzle.starting_cards()[0].label, "KNIFE");
    assert_eq!(puzzle.mistakes_allowed(), Some(3));
}

#[test]
fn unknown_start_word_is_rejected() {
    let json = with_extra(r#""startGrid": ["SPOON"]"#);
    let err = Puzzle::from_json_str(&json).unwrap_err();
    assert!(matches!(err, PuzzleError::UnknownStartWord { ref word } if word == "SPOON"));
}

#[test]
fn malformed_json_reports_json_error() {
    let err = Puzzle::from_json_str("{\"date\": ").unwrap_err();
    assert!(matches!(err, PuzzleError::Json(_)));
}

#[test]
fn reveal_order_is_by_color_rank() {
    let puzzle = Puzzle::from_json_str(DOCUMENT).unwrap();
    let colors: Vec<CategoryColor> = ordered_categories(puzzle.categories())
        .into_iter()
        .map(|category| category.color)
        .collect();
    assert_eq!(colors, CategoryColor::ALL);
}

#[test]
fn easy_solve_walk_through() {
    let puzzle = Arc::new(Puzzle::from_json_str(DOCUMENT).unwrap());
    let mut state = game_reducer(
        &GameState::default(),
        GameAction::HydratePuzzle {
            puzzle: Arc::clone(&puzzle),
            mistakes_allowed: 4,
        },
    );
    let cooking = puzzle
        .category(&"cooking-verbs".into())
        .map(|category| category.id.clone())
        .unwrap();
    let ids: Vec<WordId> = (0..4).map(|i| WordId::for_word(&cooking, i)).collect();

    for id in &ids {
        state = game_reducer(&state, GameAction::ToggleWord(id.clone()));
    }
    assert_eq!(state.selected_ids.len(), 4);

    state = game_reducer(&state, GameAction::ClearSelection);
    state = game_reducer(
        &state,
        GameAction::MarkSolvePending(PendingSolve {
            category_id: cooking.clone(),
            word_ids: ids.clone(),
        }),
    );
    assert_eq!(state.available_words.len(), 16);

    state = game_reducer(
        &state,
        GameAction::CompleteSolve {
            category_id: cooking.clone(),
            word_ids: ids,
            total_category_count: puzzle.category_count(),
        },
    );
    assert_eq!(state.available_words.len(), 12);
    assert_eq!(state.solved_category_ids, vec![cooking]);
    assert_eq!(state.mistakes_remaining, 4);
    assert_eq!(state.status, GameStatus::Playing);
    assert!(state.pending_solve.is_none());
}
