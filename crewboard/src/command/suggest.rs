//! Suggestion engine: completion candidates for partial command input.
//!
//! Pure function over the input prefix and the team roster. Rules are
//! evaluated in order and are mutually exclusive on their trigger prefix;
//! the `@` check must come before the bare `:add` check since both match
//! the `:add` prefix.

use crewboard_proto::team::User;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Template for the assigned-add form.
pub const TEMPLATE_ADD_WITH_USER: &str = ":add @username - task title";

/// Template for the self-add form.
pub const TEMPLATE_ADD: &str = ":add task title";

/// Template for the search command.
pub const TEMPLATE_SEARCH: &str = ":search query";

/// Template for the help command.
pub const TEMPLATE_HELP: &str = ":help";

/// Produces up to [`MAX_SUGGESTIONS`] completion candidates for the input.
///
/// Member-name candidates keep roster order (join order) and match
/// case-insensitively on the name prefix; each is formatted ready for
/// title entry (`":add @<name> - "`).
#[must_use]
pub fn suggest(input: &str, roster: &[User]) -> Vec<String> {
    let trimmed = input.trim().to_lowercase();

    if trimmed == ":" {
        return vec![
            TEMPLATE_ADD_WITH_USER.to_string(),
            TEMPLATE_ADD.to_string(),
            TEMPLATE_SEARCH.to_string(),
            TEMPLATE_HELP.to_string(),
        ];
    }

    if let Some(partial) = trimmed.strip_prefix(":add @") {
        return roster
            .iter()
            .filter(|member| member.name.to_lowercase().starts_with(partial))
            .take(MAX_SUGGESTIONS)
            .map(|member| format!(":add @{} - ", member.name))
            .collect();
    }

    if trimmed.starts_with(":add") && !trimmed.contains('@') {
        return vec![TEMPLATE_ADD.to_string(), TEMPLATE_ADD_WITH_USER.to_string()];
    }

    if trimmed.starts_with(":s") {
        return vec![TEMPLATE_SEARCH.to_string()];
    }

    if trimmed.starts_with(":h") {
        return vec![TEMPLATE_HELP.to_string()];
    }

    Vec::new()
}
