//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, core::pardon::PardonKind, errors::Error};

/// Suggests pardon kinds matching what the user has typed so far.
#[allow(clippy::unused_async)] // poise awaits autocomplete callbacks
pub async fn autocomplete_pardon_kind(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_pardon_kinds(partial)
}

/// Pardon kind labels containing `partial`, case-insensitively.
#[must_use]
pub fn matching_pardon_kinds(partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    PardonKind::ALL
        .into_iter()
        .map(PardonKind::as_str)
        .filter(|label| label.contains(&partial_lower))
        .map(ToString::to_string)
        .collect()
}
