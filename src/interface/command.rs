use anyhow::{bail, Context};

/// A single line of the session protocol.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    NewGame,
    Play { moves: Vec<String> },
    Moves,
    Undo,
    Status,
    History,
    Fen,
    Display,
    Perft { depth: u8 },
    Version,
    Quit,
}

fn no_arguments(parts: &[&str], command: Command) -> anyhow::Result<Command> {
    if parts.len() > 1 {
        bail!("`{}` takes no arguments, got: {}", parts[0], parts[1..].join(" "));
    }
    Ok(command)
}

fn parse_play(parts: &[&str]) -> anyhow::Result<Command> {
    if parts.len() < 2 {
        bail!("expected `{} <move1> ... <move_i>`", parts[0]);
    }
    Ok(Command::Play {
        moves: parts[1..].iter().map(ToString::to_string).collect(),
    })
}

fn parse_perft(parts: &[&str]) -> anyhow::Result<Command> {
    match parts {
        [_, depth] => {
            let depth = depth
                .parse()
                .with_context(|| format!("perft depth should be a small number, got {depth}"))?;
            Ok(Command::Perft { depth })
        },
        _ => bail!("expected `perft <depth>`"),
    }
}

impl Command {
    /// Parses a non-empty line.
    pub(super) fn parse(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(command) = parts.first() else {
            bail!("empty command");
        };

        match *command {
            "new" => no_arguments(&parts, Self::NewGame),
            "play" | "move" => parse_play(&parts),
            "moves" => no_arguments(&parts, Self::Moves),
            "undo" => no_arguments(&parts, Self::Undo),
            "status" => no_arguments(&parts, Self::Status),
            "history" => no_arguments(&parts, Self::History),
            "fen" => no_arguments(&parts, Self::Fen),
            "d" => no_arguments(&parts, Self::Display),
            "perft" => parse_perft(&parts),
            "version" => no_arguments(&parts, Self::Version),
            "quit" | "exit" => Ok(Self::Quit),
            _ => bail!("unknown command: {}", input.trim()),
        }
    }
}
