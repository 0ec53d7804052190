//! Per-entry parsing: characters, options, changes and triggers.
//!
//! Malformed entries are dropped here. Callers never see an error for them.

use story_model::{
    ChangeEntry, CharacterEntry, CharacterState, Comparison, CounterChange, CounterTrigger,
    OptionEntry, Side, StoryOption, TriggerEntry,
};
use tracing::debug;

use super::LoaderConfig;

pub(crate) fn parse_character(entry: &CharacterEntry, default_side: Side) -> CharacterState {
    CharacterState {
        name: entry.name.clone().unwrap_or_default(),
        image: entry.image.clone(),
        side: entry.side.as_deref().map(Side::parse).unwrap_or(default_side),
        expression: entry.expression.clone(),
    }
}

/// Compact-form changes come first, then explicit `change` entries.
pub(crate) fn parse_option(entry: &OptionEntry, config: &LoaderConfig) -> StoryOption {
    let mut changes = entry.affect.as_deref().map(parse_affect).unwrap_or_default();
    changes.extend(entry.changes.iter().filter_map(parse_change));

    StoryOption {
        text: entry
            .text
            .clone()
            .unwrap_or_else(|| config.default_option_text.clone()),
        goto: entry.goto.clone(),
        changes,
    }
}

/// Parse a compact change list such as `"like:+1, trust:-2"`.
///
/// Entries that are not exactly `name:integer` are skipped.
pub(crate) fn parse_affect(raw: &str) -> Vec<CounterChange> {
    raw.split(',')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let pieces: Vec<&str> = part.split(':').filter(|p| !p.is_empty()).collect();
            let change = match pieces.as_slice() {
                [name, delta] if !name.trim().is_empty() => delta
                    .trim()
                    .parse()
                    .ok()
                    .map(|delta| CounterChange::new(name.trim(), delta)),
                _ => None,
            };
            if change.is_none() {
                debug!(entry = part, "Skipping malformed affect entry");
            }
            change
        })
        .collect()
}

pub(crate) fn parse_change(entry: &ChangeEntry) -> Option<CounterChange> {
    let counter = entry.counter.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let delta = entry.delta.as_ref().and_then(|d| d.as_i32());

    match (counter, delta) {
        (Some(counter), Some(delta)) => Some(CounterChange::new(counter, delta)),
        _ => {
            debug!(?entry, "Skipping change without counter or integer delta");
            None
        }
    }
}

/// Missing fields take defaults; only a non-integer `value` drops the trigger.
pub(crate) fn parse_trigger(entry: &TriggerEntry) -> Option<CounterTrigger> {
    let value = match &entry.value {
        None => 0,
        Some(raw) => match raw.as_i32() {
            Some(value) => value,
            None => {
                debug!(?entry, "Skipping counter trigger with non-integer value");
                return None;
            }
        },
    };

    Some(CounterTrigger {
        counter: entry.counter.clone().unwrap_or_default(),
        operator: entry
            .operator
            .as_deref()
            .map(Comparison::parse)
            .unwrap_or_default(),
        value,
        goto: entry.goto.clone().unwrap_or_default(),
    })
}
