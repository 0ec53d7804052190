//! Headless playback: drives the engine with scripted choices and prints each node.

use story_engine::StoryEngine;
use story_model::StoryNode;

/// How a headless run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Ended,
    /// The story has no nodes.
    Empty,
    /// A node with options was reached after the scripted choices ran out.
    AwaitingChoice,
    /// A scripted choice index does not exist on the current node.
    InvalidChoice(usize),
    StepLimit,
}

/// Start the story and keep advancing until it ends or needs input we don't have.
pub fn run(engine: &mut StoryEngine, choices: &[usize], max_steps: usize) -> PlayOutcome {
    engine.start();
    let mut choices = choices.iter().copied();

    for _ in 0..max_steps {
        if engine.is_ended() {
            return PlayOutcome::Ended;
        }
        let Some(node) = engine.current_node() else {
            return PlayOutcome::Empty;
        };

        if node.has_options() {
            let Some(choice) = choices.next() else {
                return PlayOutcome::AwaitingChoice;
            };
            if !engine.choose(choice) {
                return PlayOutcome::InvalidChoice(choice);
            }
        } else {
            engine.next();
        }
    }

    if engine.is_ended() {
        PlayOutcome::Ended
    } else {
        PlayOutcome::StepLimit
    }
}

/// Text block printed for an activated node.
pub fn render_node(node: &StoryNode) -> String {
    let mut out = format!("[{}]", node.id);

    if node.background.explicitly_set {
        out.push_str(&format!(" bg={}", node.background.as_deref().unwrap_or("<clear>")));
    }
    if node.music.explicitly_set {
        out.push_str(&format!(" music={}", node.music.as_deref().unwrap_or("<stop>")));
    }
    if !node.characters.is_empty() {
        let cast: Vec<_> = node
            .characters
            .iter()
            .map(|c| match &c.expression {
                Some(expression) => format!("{} ({}, {})", c.name, c.side, expression),
                None => format!("{} ({})", c.name, c.side),
            })
            .collect();
        out.push_str(&format!(" cast: {}", cast.join(", ")));
    }
    out.push('\n');

    match &node.speaker {
        Some(speaker) => out.push_str(&format!("  {}: {}\n", speaker, node.text)),
        None => out.push_str(&format!("  {}\n", node.text)),
    }

    for (index, option) in node.options.iter().enumerate() {
        out.push_str(&format!("    {}) {}\n", index, option.text));
    }

    out
}
