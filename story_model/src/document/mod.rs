//! The raw document tree, as authored.
//!
//! These types mirror the authoring schema one-to-one: a root holding `nodes`, each node
//! with optional `id`, `bg`, `music`, `speaker` and `text`, plus `characters`, `options`,
//! `changes` and `counterTriggers` collections. Singular element names (`node`,
//! `character`, `option`, `change`, `counterTrigger`) are accepted as aliases.
//!
//! Nothing here is validated. Deciding what an entry means (defaults, skipped entries,
//! inheritance) is the loader's job.

use serde::{Deserialize, Serialize};

/// Root of an authored story document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryDocument {
    /// `None` when the root has no node collection at all.
    #[serde(default, alias = "node")]
    pub nodes: Option<Vec<NodeEntry>>,
}

/// One authored `node`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "background")]
    pub bg: Option<String>,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "character")]
    pub characters: Vec<CharacterEntry>,
    #[serde(default, alias = "option")]
    pub options: Vec<OptionEntry>,
    #[serde(default, alias = "change")]
    pub changes: Vec<ChangeEntry>,
    #[serde(default, alias = "counterTrigger")]
    pub counter_triggers: Vec<TriggerEntry>,
}

impl NodeEntry {
    pub fn background(&self) -> Authored<&str> {
        Authored::from_attr(self.bg.as_deref())
    }

    pub fn music(&self) -> Authored<&str> {
        Authored::from_attr(self.music.as_deref())
    }
}

/// One authored `character` on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
}

/// One authored `option` on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub goto: Option<String>,

    /// Compact change list, e.g. `"like:+1, trust:-2"`.
    #[serde(default)]
    pub affect: Option<String>,

    #[serde(default, alias = "change")]
    pub changes: Vec<ChangeEntry>,
}

/// One authored `change`, on a node or inside an option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    #[serde(default)]
    pub counter: Option<String>,
    #[serde(default)]
    pub delta: Option<Scalar>,
}

/// One authored `counterTrigger` on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerEntry {
    #[serde(default)]
    pub counter: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub goto: Option<String>,
}

/// An attribute value that may be authored as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    /// Integer value, accepting surrounding whitespace and a leading sign in text form.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Scalar::Integer(n) => i32::try_from(*n).ok(),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Float(_) | Scalar::Bool(_) => None,
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// State of an optional attribute that can be inherited or explicitly cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authored<T> {
    /// Not mentioned; inherit from the previous node.
    Unset,
    /// Mentioned with an empty value.
    Cleared,
    Value(T),
}

impl<'a> Authored<&'a str> {
    fn from_attr(raw: Option<&'a str>) -> Self {
        match raw {
            None => Authored::Unset,
            Some(s) if s.trim().is_empty() => Authored::Cleared,
            Some(s) => Authored::Value(s),
        }
    }
}

impl<T> Authored<T> {
    pub fn is_set(&self) -> bool {
        !matches!(self, Authored::Unset)
    }
}
