//! Command-line parsing.

use std::path::PathBuf;

use anyhow::{bail, Context};

pub const USAGE: &str = "Usage: story_view <command>

Commands:
  graph <story> [--dot | --json] [--use-label]
      Print the branch graph of a story (DOT by default).
  play <story> [choice ...] [--config <file.toml>]
      Play a story headlessly, picking options by zero-based index.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Dot,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Graph {
        story: PathBuf,
        format: GraphFormat,
        use_label: bool,
    },
    Play {
        story: PathBuf,
        choices: Vec<usize>,
        config: Option<PathBuf>,
    },
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut args = args.iter().map(String::as_str);
        match args.next() {
            Some("graph") => parse_graph(args),
            Some("play") => parse_play(args),
            Some("help" | "-h" | "--help") | None => Ok(Command::Help),
            Some(cmd) => bail!("Unknown command: {cmd}\n\n{USAGE}"),
        }
    }
}

fn parse_graph<'a>(args: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut story = None;
    let mut format = GraphFormat::Dot;
    let mut use_label = false;

    for arg in args {
        match arg {
            "--dot" => format = GraphFormat::Dot,
            "--json" => format = GraphFormat::Json,
            "--use-label" => use_label = true,
            flag if flag.starts_with("--") => bail!("Unknown graph option: {flag}"),
            path if story.is_none() => story = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument: {extra}"),
        }
    }

    Ok(Command::Graph {
        story: story.context("graph needs a story file")?,
        format,
        use_label,
    })
}

fn parse_play<'a>(mut args: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut story = None;
    let mut choices = Vec::new();
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg {
            "--config" => {
                let path = args.next().context("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown play option: {flag}"),
            path if story.is_none() => story = Some(PathBuf::from(path)),
            choice => choices.push(
                choice
                    .parse()
                    .with_context(|| format!("choice must be a number, got {choice:?}"))?,
            ),
        }
    }

    Ok(Command::Play {
        story: story.context("play needs a story file")?,
        choices,
        config,
    })
}
