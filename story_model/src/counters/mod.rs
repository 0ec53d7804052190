//! Counters: named integers (affection, flags) changed by nodes and options.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Adds `delta` to a named counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterChange {
    pub counter: String,
    pub delta: i32,
}

impl CounterChange {
    pub fn new(counter: impl Into<String>, delta: i32) -> Self {
        Self {
            counter: counter.into(),
            delta,
        }
    }
}

/// Comparison used by a counter trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Comparison {
    #[default]
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Less,
    Equal,
}

impl Comparison {
    /// Parse an authored operator. Missing or unknown operators mean `>=`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "<=" => Comparison::LessOrEqual,
            ">" => Comparison::Greater,
            "<" => Comparison::Less,
            "==" | "=" => Comparison::Equal,
            _ => Comparison::GreaterOrEqual,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::Equal => "==",
        }
    }

    /// Compare a current counter value against a threshold.
    pub fn holds(&self, current: i32, threshold: i32) -> bool {
        match self {
            Comparison::GreaterOrEqual => current >= threshold,
            Comparison::LessOrEqual => current <= threshold,
            Comparison::Greater => current > threshold,
            Comparison::Less => current < threshold,
            Comparison::Equal => current == threshold,
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Jumps to `goto` when `counter <op> value` holds after a node's changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTrigger {
    pub counter: String,
    pub operator: Comparison,
    pub value: i32,
    pub goto: String,
}

impl CounterTrigger {
    pub fn new(
        counter: impl Into<String>,
        operator: Comparison,
        value: i32,
        goto: impl Into<String>,
    ) -> Self {
        Self {
            counter: counter.into(),
            operator,
            value,
            goto: goto.into(),
        }
    }

    /// Evaluate against a counter table; unset counters read as 0.
    pub fn is_met(&self, counters: &CounterTable) -> bool {
        self.operator.holds(counters.get(&self.counter), self.value)
    }
}

impl std::fmt::Display for CounterTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.counter, self.operator, self.value)
    }
}

/// Per-session counter values.
///
/// There is no declaration step: reading an unset counter yields 0 and writing one
/// starts it from 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTable {
    values: HashMap<String, i32>,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, 0 when unset.
    pub fn get(&self, counter: &str) -> i32 {
        self.values.get(counter).copied().unwrap_or(0)
    }

    /// Whether the counter has ever been written this session.
    pub fn contains(&self, counter: &str) -> bool {
        self.values.contains_key(counter)
    }

    /// Apply one change and return the new value. Saturates at the `i32` bounds.
    pub fn apply(&mut self, change: &CounterChange) -> i32 {
        let value = self.values.entry(change.counter.clone()).or_insert(0);
        *value = value.saturating_add(change.delta);
        *value
    }

    /// Apply changes in order.
    pub fn apply_all<'a>(&mut self, changes: impl IntoIterator<Item = &'a CounterChange>) {
        for change in changes {
            self.apply(change);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Counters sorted by name, for stable display.
    pub fn sorted(&self) -> Vec<(&str, i32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_counter_reads_zero() {
        let table = CounterTable::new();
        assert_eq!(table.get("like"), 0);
        assert!(!table.contains("like"));
    }

    #[test]
    fn test_apply_to_unset_counter_yields_delta() {
        let mut table = CounterTable::new();
        assert_eq!(table.apply(&CounterChange::new("like", 5)), 5);
        assert_eq!(table.get("like"), 5);
    }

    #[test]
    fn test_apply_all_accumulates() {
        let mut table = CounterTable::new();
        table.apply_all(&[CounterChange::new("like", 1), CounterChange::new("like", -3)]);
        assert_eq!(table.get("like"), -2);
    }

    #[test]
    fn test_apply_saturates() {
        let mut table = CounterTable::new();
        table.apply(&CounterChange::new("x", i32::MAX));
        table.apply(&CounterChange::new("x", 1));
        assert_eq!(table.get("x"), i32::MAX);
    }

    #[test]
    fn test_comparison_parse() {
        assert_eq!(Comparison::parse(">="), Comparison::GreaterOrEqual);
        assert_eq!(Comparison::parse("<="), Comparison::LessOrEqual);
        assert_eq!(Comparison::parse(">"), Comparison::Greater);
        assert_eq!(Comparison::parse("<"), Comparison::Less);
        assert_eq!(Comparison::parse("=="), Comparison::Equal);
        assert_eq!(Comparison::parse("="), Comparison::Equal);
        assert_eq!(Comparison::parse("!="), Comparison::GreaterOrEqual);
        assert_eq!(Comparison::parse(""), Comparison::GreaterOrEqual);
    }

    #[test]
    fn test_comparison_holds() {
        assert!(Comparison::GreaterOrEqual.holds(2, 2));
        assert!(!Comparison::Greater.holds(2, 2));
        assert!(Comparison::LessOrEqual.holds(-1, 0));
        assert!(Comparison::Less.holds(-1, 0));
        assert!(Comparison::Equal.holds(3, 3));
        assert!(!Comparison::Equal.holds(3, 4));
    }

    #[test]
    fn test_trigger_reads_unset_as_zero() {
        let table = CounterTable::new();
        let trigger = CounterTrigger::new("trust", Comparison::LessOrEqual, 0, "bad_end");
        assert!(trigger.is_met(&table));
        assert_eq!(trigger.to_string(), "trust <= 0");
    }

    #[test]
    fn test_sorted() {
        let mut table = CounterTable::new();
        table.apply(&CounterChange::new("b", 1));
        table.apply(&CounterChange::new("a", 2));
        assert_eq!(table.sorted(), vec![("a", 2), ("b", 1)]);
    }
}
