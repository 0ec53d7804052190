//! Story Viewer - branch graph export and headless playback for story documents.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod config;
mod play;

use args::{Command, GraphFormat, USAGE};
use config::ViewConfig;
use play::PlayOutcome;
use story_engine::{StoryEngine, StoryGraph, StoryLoader};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_view=info,story_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match Command::parse(&args)? {
        Command::Graph {
            story,
            format,
            use_label,
        } => {
            let story = StoryLoader::with_defaults()
                .load_path(&story)
                .with_context(|| format!("loading {}", story.display()))?;
            let graph = StoryGraph::from_story(&story);

            for edge in graph.dangling_edges() {
                tracing::warn!(from = %edge.from, to = %edge.to, "Dangling jump target");
            }

            match format {
                GraphFormat::Dot => println!("{}", graph.to_dot(use_label)),
                GraphFormat::Json => println!("{}", graph.to_json()?),
            }
        }
        Command::Play {
            story,
            choices,
            config,
        } => {
            let config = match config {
                Some(path) => ViewConfig::from_path(&path)?,
                None => ViewConfig::default(),
            };
            let story = StoryLoader::new(config.loader.clone())
                .load_path(&story)
                .with_context(|| format!("loading {}", story.display()))?;

            let mut engine = StoryEngine::with_story(story);
            engine.subscribe_node_changed(Box::new(|node| print!("{}", play::render_node(node))));
            engine.subscribe_story_ended(Box::new(|| println!("-- The End --")));

            let outcome = play::run(&mut engine, &choices, config.max_steps);
            tracing::info!(?outcome, "Playback stopped");
            if outcome == PlayOutcome::StepLimit {
                tracing::warn!(max_steps = config.max_steps, "Step limit reached");
            }

            let counters = engine.counters().sorted();
            if !counters.is_empty() {
                println!("Counters:");
                for (name, value) in counters {
                    println!("  {name} = {value}");
                }
            }
        }
        Command::Help => println!("{USAGE}"),
    }

    Ok(())
}
