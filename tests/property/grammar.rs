//! Property-based tests for the command grammar and suggestion engine.
//!
//! Uses proptest to verify:
//! 1. Any input that does not start with `:` classifies as a trimmed search.
//! 2. Classification is pure: idempotent and panic-free on arbitrary input.
//! 3. Well-formed add commands survive classification with their fields.
//! 4. Suggestions never exceed the cap and are deterministic.

use proptest::prelude::*;

use crewboard::command::{Intent, classify, suggest};
use crewboard_proto::team::{User, UserId};

// --- Strategies ---

/// Strategy for valid usernames (`^[A-Za-z0-9_]+$`).
fn arb_username() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,24}"
}

/// Strategy for printable task titles that survive trimming.
fn arb_title() -> impl Strategy<Value = String> {
    "[ -~]{1,100}".prop_filter("title must be non-empty after trim", |t| {
        !t.trim().is_empty()
    })
}

/// Strategy for arbitrary input lines (no NUL, bounded length).
fn arb_input() -> impl Strategy<Value = String> {
    "[^\x00]{0,200}"
}

/// Strategy for a roster of up to 12 members.
fn arb_roster() -> impl Strategy<Value = Vec<User>> {
    prop::collection::vec("[A-Za-z0-9_]{1,16}", 0..12).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| User {
                id: UserId::new(),
                name,
                created_at: i as u64,
            })
            .collect()
    })
}

// --- Property tests ---

proptest! {
    /// Any input that does not start with `:` is an implicit search on the
    /// trimmed text.
    #[test]
    fn non_command_input_is_trimmed_search(input in arb_input()) {
        prop_assume!(!input.trim().starts_with(':'));
        let intent = classify(&input);
        prop_assert_eq!(
            intent,
            Intent::Search { query: input.trim().to_string() }
        );
    }

    /// Classification is a pure function: same input, same intent.
    #[test]
    fn classify_is_idempotent(input in arb_input()) {
        prop_assert_eq!(classify(&input), classify(&input));
    }

    /// Arbitrary input never panics the grammar — including inputs full of
    /// multi-byte characters around keyword boundaries.
    #[test]
    fn classify_never_panics(input in "\\PC{0,200}") {
        let _ = classify(&input);
    }

    /// A well-formed assigned add command classifies into its fields.
    #[test]
    fn well_formed_add_round_trips(user in arb_username(), title in arb_title()) {
        let input = format!(":add @{user} - {title}");
        let intent = classify(&input);
        prop_assert_eq!(
            intent,
            Intent::AddTask {
                title: title.trim().to_string(),
                assignee: Some(user),
            }
        );
    }

    /// A well-formed self add command keeps the trimmed title.
    #[test]
    fn well_formed_self_add_round_trips(title in arb_title()) {
        prop_assume!(!title.trim().starts_with('@'));
        let input = format!(":add {title}");
        let intent = classify(&input);
        prop_assert_eq!(
            intent,
            Intent::AddTask {
                title: title.trim().to_string(),
                assignee: None,
            }
        );
    }

    /// Suggestions are capped at five for any input and roster.
    #[test]
    fn suggestions_never_exceed_cap(input in arb_input(), roster in arb_roster()) {
        prop_assert!(suggest(&input, &roster).len() <= 5);
    }

    /// The suggestion engine is deterministic.
    #[test]
    fn suggestions_are_deterministic(input in arb_input(), roster in arb_roster()) {
        prop_assert_eq!(suggest(&input, &roster), suggest(&input, &roster));
    }

    /// Member suggestions always carry the ready-for-title suffix.
    #[test]
    fn member_suggestions_are_title_ready(partial in "[A-Za-z0-9_]{0,8}", roster in arb_roster()) {
        let input = format!(":add @{partial}");
        for suggestion in suggest(&input, &roster) {
            prop_assert!(suggestion.starts_with(":add @"));
            prop_assert!(suggestion.ends_with(" - "));
        }
    }
}
