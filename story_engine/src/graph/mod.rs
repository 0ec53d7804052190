//! Story Graph - the static branch structure of a story, for authoring tools.
//!
//! Edges are collected per node, in node order:
//! 1. **Options**: an option with a goto points at its target; one without points at
//!    the next node
//! 2. **Triggers**: every counter trigger with a goto points at its target
//! 3. **Sequence**: a node without options points at the next node
//!
//! Targets that do not exist are kept and flagged as dangling, since playback will
//! silently ignore them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use story_model::{Story, StoryNode};

/// Why one node can lead to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// An option with an explicit goto.
    Option,
    /// An option without a goto, continuing to the next node.
    OptionDefault,
    /// A counter trigger redirect.
    Trigger,
    /// Plain "next" from a node without options.
    Sequence,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Option => "option",
            EdgeKind::OptionDefault => "option_default",
            EdgeKind::Trigger => "trigger",
            EdgeKind::Sequence => "next",
        }
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,

    /// Option text or trigger condition.
    pub label: String,

    /// The target id does not exist in the story.
    pub dangling: bool,
}

/// A node as shown in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub speaker: Option<String>,
    pub text: String,
}

/// Nodes and edges of a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl StoryGraph {
    /// Collect the graph of a loaded story.
    pub fn from_story(story: &Story) -> Self {
        let mut graph = Self {
            nodes: story
                .nodes()
                .iter()
                .map(|n| GraphNode {
                    id: n.id.to_string(),
                    speaker: n.speaker.clone(),
                    text: n.text.clone(),
                })
                .collect(),
            edges: Vec::new(),
        };

        let mut seen = HashSet::new();
        for (index, node) in story.nodes().iter().enumerate() {
            let next = story.get(index + 1);
            for edge in node_edges(story, node, next) {
                if seen.insert((edge.from.clone(), edge.to.clone(), edge.kind)) {
                    graph.edges.push(edge);
                }
            }
        }

        graph
    }

    /// Edges whose target does not exist.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.dangling)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    /// Ids of nodes no edge points at, other than the first node.
    pub fn unreachable(&self) -> Vec<&str> {
        let targets: HashSet<&str> = self.edges.iter().map(|e| e.to.as_str()).collect();
        self.nodes
            .iter()
            .skip(1)
            .map(|n| n.id.as_str())
            .filter(|id| !targets.contains(id))
            .collect()
    }

    /// Render as Graphviz DOT. With `use_label`, nodes show their text instead of their id.
    pub fn to_dot(&self, use_label: bool) -> String {
        let mut dot = String::new();
        dot.push_str("digraph story {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n");

        for node in &self.nodes {
            let label = if use_label && !node.text.is_empty() {
                shorten(&node.text, 60)
            } else {
                node.id.clone()
            };
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\"];\n",
                escape(&node.id),
                escape(&label)
            ));
        }

        for edge in &self.edges {
            let label = if edge.label.is_empty() {
                edge.kind.as_str().to_string()
            } else {
                format!("{}: {}", edge.kind.as_str(), edge.label)
            };
            let style = if edge.dangling { ", style=dashed, color=red" } else { "" };
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"{}];\n",
                escape(&edge.from),
                escape(&edge.to),
                escape(&label),
                style
            ));
        }

        dot.push('}');
        dot
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn node_edges(story: &Story, node: &StoryNode, next: Option<&StoryNode>) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    let edge = |to: &str, kind: EdgeKind, label: String| GraphEdge {
        from: node.id.to_string(),
        to: to.to_string(),
        kind,
        label,
        dangling: story.index_of(to).is_none(),
    };

    for option in &node.options {
        match (option.target(), next) {
            (Some(target), _) => edges.push(edge(target, EdgeKind::Option, option.text.clone())),
            (None, Some(next)) => {
                edges.push(edge(next.id.as_str(), EdgeKind::OptionDefault, option.text.clone()))
            }
            (None, None) => {}
        }
    }

    for trigger in &node.counter_triggers {
        if !trigger.goto.is_empty() {
            edges.push(edge(&trigger.goto, EdgeKind::Trigger, trigger.to_string()));
        }
    }

    if !node.has_options() {
        if let Some(next) = next {
            edges.push(edge(next.id.as_str(), EdgeKind::Sequence, String::new()));
        }
    }

    edges
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', " ")
}

fn shorten(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_model::{Comparison, CounterTrigger, StoryOption};

    fn branching_story() -> Story {
        Story::new(vec![
            StoryNode::new("start")
                .with_text("Where to?")
                .with_option(StoryOption::new("Park").with_goto("park"))
                .with_option(StoryOption::new("Stay")),
            StoryNode::new("home"),
            StoryNode::new("park")
                .with_trigger(CounterTrigger::new("like", Comparison::GreaterOrEqual, 2, "good_end"))
                .with_trigger(CounterTrigger::new("like", Comparison::Less, 0, "missing")),
            StoryNode::new("good_end"),
        ])
    }

    #[test]
    fn test_collects_edges() {
        let graph = StoryGraph::from_story(&branching_story());

        let start: Vec<_> = graph.outgoing("start").map(|e| (e.to.as_str(), e.kind)).collect();
        assert_eq!(
            start,
            vec![("park", EdgeKind::Option), ("home", EdgeKind::OptionDefault)]
        );

        let park: Vec<_> = graph.outgoing("park").map(|e| (e.to.as_str(), e.kind)).collect();
        assert_eq!(
            park,
            vec![
                ("good_end", EdgeKind::Trigger),
                ("missing", EdgeKind::Trigger),
                ("good_end", EdgeKind::Sequence),
            ]
        );

        assert_eq!(graph.outgoing("good_end").count(), 0);
    }

    #[test]
    fn test_dangling_edges() {
        let graph = StoryGraph::from_story(&branching_story());
        let dangling: Vec<_> = graph.dangling_edges().map(|e| e.to.as_str()).collect();
        assert_eq!(dangling, vec!["missing"]);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let story = Story::new(vec![
            StoryNode::new("a")
                .with_option(StoryOption::new("one").with_goto("b"))
                .with_option(StoryOption::new("two").with_goto("b")),
            StoryNode::new("b"),
        ]);
        let graph = StoryGraph::from_story(&story);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].label, "one");
    }

    #[test]
    fn test_unreachable() {
        let story = Story::new(vec![
            StoryNode::new("a").with_option(StoryOption::new("skip").with_goto("c")),
            StoryNode::new("b"),
            StoryNode::new("c"),
        ]);
        let graph = StoryGraph::from_story(&story);
        assert_eq!(graph.unreachable(), vec!["b"]);
    }

    #[test]
    fn test_to_dot() {
        let dot = StoryGraph::from_story(&branching_story()).to_dot(false);
        assert!(dot.starts_with("digraph story {"));
        assert!(dot.contains("\"start\" -> \"park\" [label=\"option: Park\"];"));
        assert!(dot.contains("\"park\" -> \"good_end\" [label=\"trigger: like >= 2\"];"));
        assert!(dot.contains("\"park\" -> \"missing\" [label=\"trigger: like < 0\", style=dashed, color=red];"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_to_dot_with_labels() {
        let dot = StoryGraph::from_story(&branching_story()).to_dot(true);
        assert!(dot.contains("\"start\" [label=\"Where to?\"];"));
        assert!(dot.contains("\"home\" [label=\"home\"];"));
    }

    #[test]
    fn test_to_json() {
        let json = StoryGraph::from_story(&branching_story()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().map(|n| n.len()), Some(4));
        assert_eq!(value["edges"][0]["kind"], "option");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("abcdef", 3), "abc...");
        assert_eq!(shorten("abc", 3), "abc");
    }
}
