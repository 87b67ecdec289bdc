//! Command grammar: classify raw input into an [`Intent`].
//!
//! Pure and side-effect free. A leading `:` is a hard commitment to
//! command parsing — a `:`-prefixed typo classifies as `Invalid`, never as
//! a fallback search. Anything else is an implicit search on the trimmed
//! text.

use crewboard_proto::task::validate_title;

use super::Intent;

/// Reason shown for a `:`-prefixed input that matches no command.
pub const UNKNOWN_COMMAND: &str = "Unknown command. Type :help for available commands.";

/// Reason shown when an add command's title fails the length rule.
pub const INVALID_TITLE: &str = "Task title must be between 1 and 255 characters";

/// Reason shown when an add command's assignee fails the character rule.
pub const INVALID_USERNAME: &str = "Username can only contain letters, numbers, and underscores";

/// Classifies raw input text into an [`Intent`].
///
/// Command keywords are case-insensitive and whitespace-tolerant at the
/// boundaries; whitespace inside titles and queries is preserved.
#[must_use]
pub fn classify(input: &str) -> Intent {
    let trimmed = input.trim();

    if !trimmed.starts_with(':') {
        return Intent::Search {
            query: trimmed.to_string(),
        };
    }

    if let Some(rest) = strip_keyword(trimmed, ":add") {
        return validate_add(parse_add(rest));
    }

    if let Some(rest) = strip_keyword(trimmed, ":search") {
        return Intent::Search {
            query: rest.to_string(),
        };
    }

    if trimmed.eq_ignore_ascii_case(":help") {
        return Intent::Help;
    }

    Intent::Invalid {
        reason: UNKNOWN_COMMAND.to_string(),
    }
}

/// Strips a case-insensitive command keyword followed by whitespace and a
/// non-empty argument, returning the trimmed argument text.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    if input.len() < keyword.len() || !input.is_char_boundary(keyword.len()) {
        return None;
    }
    let (head, rest) = input.split_at(keyword.len());
    if !head.eq_ignore_ascii_case(keyword) || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Splits the argument text of an add command into title and assignee.
///
/// `@<user> - <title>` assigns to a member; any other shape (including an
/// `@` with no `-` separator) is a plain self-add whose title is the whole
/// argument text.
fn parse_add(rest: &str) -> Intent {
    if let Some(after_at) = rest.strip_prefix('@') {
        // The name runs to the first whitespace or separator dash.
        let end = after_at
            .find(|c: char| c.is_whitespace() || c == '-')
            .unwrap_or(after_at.len());
        let (name, tail) = after_at.split_at(end);
        if let Some(title) = tail.trim_start().strip_prefix('-') {
            let title = title.trim();
            if !name.is_empty() && !title.is_empty() {
                return Intent::AddTask {
                    title: title.to_string(),
                    assignee: Some(name.to_string()),
                };
            }
        }
    }

    Intent::AddTask {
        title: rest.to_string(),
        assignee: None,
    }
}

/// Applies the add-command validation rules, flipping a syntactically valid
/// add into `Invalid` when a rule fails.
fn validate_add(intent: Intent) -> Intent {
    let Intent::AddTask { title, assignee } = intent else {
        return intent;
    };

    if !validate_title(&title) {
        return Intent::Invalid {
            reason: INVALID_TITLE.to_string(),
        };
    }

    if let Some(name) = &assignee
        && !is_valid_username(name)
    {
        return Intent::Invalid {
            reason: INVALID_USERNAME.to_string(),
        };
    }

    Intent::AddTask { title, assignee }
}

/// Whether a name satisfies `^[A-Za-z0-9_]+$`.
fn is_valid_username(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
