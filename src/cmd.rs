//! Text commands for the interactive loop.
//!
//! A line is split on spaces with quoted substrings kept together. `rename`
//! keeps the rest of the line as typed, so `rename 2 O'Brien lab` and
//! `rename 2 'core switches'` both work. Subnets are referenced by row
//! number, exact CIDR, or id (full or the 8-char prefix).

use crate::config::Config;
use crate::models::{
    network_address_of, parse_address, parse_prefix_length, Address, Cidr, NetworkInput, SubnetId,
};
use crate::output::{default_export_path, render_table, write_export, ExportFormat};
use crate::processing::{find_joinable_pairs, Partition, Session};
use regex::Regex;
use std::error::Error;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

pub const HELP: &str = "\
commands:
  show                      print the table
  divide <ref>              split a subnet in two
  join <ref> <ref>          merge two sibling subnets
  joinat /<level> <addr>    merge the sibling pair under an ancestor block
  rename <ref> <name>       label a subnet (empty name clears it)
  pairs                     list joinable sibling pairs
  export csv|json [file]    write the table
  reset <addr>/<prefix>     start again from a new block
  help | quit
<ref> is a row number, a CIDR such as 10.0.0.0/24, or a subnet id";

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Divide(String),
    Join(String, String),
    JoinAt { level: u8, ancestor: Address },
    Rename(String, String),
    Pairs,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    Reset(NetworkInput),
    Help,
    Quit,
}

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// Drop one pair of matching quotes around `text`.
fn strip_outer_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner;
        }
    }
    text
}

/// `rename <ref> <name>` with the name taken verbatim from the line.
fn parse_rename(rest: &str) -> Option<Command> {
    let rest = rest.trim();
    let (reference, name) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(r, n)| (r, n.trim()));
    if reference.is_empty() {
        return None;
    }
    Some(Command::Rename(
        reference.to_string(),
        strip_outer_quotes(name).to_string(),
    ))
}

/// Parse one input line. Blank lines parse as [`Command::Show`].
pub fn parse_command(line: &str) -> Result<Command, Box<dyn Error>> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if matches!(head.to_ascii_lowercase().as_str(), "rename" | "r") {
        return parse_rename(rest).ok_or_else(|| "Usage: rename <ref> <name>".into());
    }

    let words: Vec<&str> = split_and_strip(line);
    log::trace!("split words={:?}", words);

    let (cmd, args) = match words.split_first() {
        Some((cmd, args)) => (cmd.to_ascii_lowercase(), args),
        None => return Ok(Command::Show),
    };

    let command = match (cmd.as_str(), args) {
        ("" | "show" | "ls", _) => Command::Show,
        ("divide" | "d", [reference]) => Command::Divide(reference.to_string()),
        ("join" | "j", [a, b]) => Command::Join(a.to_string(), b.to_string()),
        ("joinat", [level, ancestor]) => {
            let level = parse_prefix_length(level)?;
            Command::JoinAt {
                level,
                ancestor: network_address_of(parse_address(ancestor)?, level)?,
            }
        }
        ("joinat", [block]) => {
            let cidr = Cidr::new(block)?;
            Command::JoinAt {
                level: cidr.prefix,
                ancestor: cidr.network,
            }
        }
        ("pairs", []) => Command::Pairs,
        ("export", [format]) => Command::Export {
            format: format.parse()?,
            path: None,
        },
        ("export", [format, path]) => Command::Export {
            format: format.parse()?,
            path: Some(PathBuf::from(path)),
        },
        ("reset", [cidr]) => Command::Reset(NetworkInput::from_cidr_text(cidr)),
        ("reset", [address, prefix]) => Command::Reset(NetworkInput::new(address, prefix)),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        _ => return Err(format!("Unknown or malformed command: '{line}'").into()),
    };
    Ok(command)
}

/// Find the subnet a user reference points at.
pub fn resolve_ref(partition: &Partition, reference: &str) -> Result<SubnetId, Box<dyn Error>> {
    let reference = reference.trim();
    if let Ok(row) = reference.parse::<usize>() {
        return partition
            .subnets()
            .get(row.wrapping_sub(1))
            .map(|s| s.id())
            .ok_or_else(|| format!("No row {row} (1-{})", partition.len()).into());
    }
    if reference.contains('/') {
        let cidr = Cidr::new(reference)?;
        return partition
            .find_by_cidr(cidr)
            .map(|s| s.id())
            .ok_or_else(|| format!("No subnet {cidr} in current partition").into());
    }
    if let Ok(id) = reference.parse::<SubnetId>() {
        return Ok(id);
    }
    let matches: Vec<SubnetId> = partition
        .subnets()
        .iter()
        .map(|s| s.id())
        .filter(|id| id.short() == reference.to_ascii_lowercase())
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No subnet matches '{reference}'").into()),
        _ => Err(format!("'{reference}' is ambiguous").into()),
    }
}

/// Run a command against the session.
pub fn execute(
    session: &mut Session,
    command: Command,
    config: &Config,
) -> Result<Outcome, Box<dyn Error>> {
    match command {
        Command::Show => {}
        Command::Divide(reference) => {
            let id = resolve_ref(session.partition(), &reference)?;
            session.divide(id)?;
        }
        Command::Join(a, b) => {
            let a = resolve_ref(session.partition(), &a)?;
            let b = resolve_ref(session.partition(), &b)?;
            session.join(a, b)?;
        }
        Command::JoinAt { level, ancestor } => {
            session.join_at(level, ancestor)?;
        }
        Command::Rename(reference, name) => {
            let id = resolve_ref(session.partition(), &reference)?;
            session.rename(id, &name)?;
        }
        Command::Pairs => {
            let pairs = find_joinable_pairs(session.snapshot());
            if pairs.is_empty() {
                return Ok(Outcome::Continue("No joinable pairs.".to_string()));
            }
            let lines: Vec<String> = pairs
                .iter()
                .map(|p| format!("{} + {} -> {}", p.child1.short(), p.child2.short(), p.parent))
                .collect();
            return Ok(Outcome::Continue(lines.join("\n")));
        }
        Command::Export { format, path } => {
            let path = path.unwrap_or_else(|| default_export_path(&config.export_dir, format));
            write_export(session.snapshot(), &config.display, format, &path)?;
            return Ok(Outcome::Continue(format!("Wrote {}", path.display())));
        }
        Command::Reset(input) => {
            session.reset(&input)?;
        }
        Command::Help => return Ok(Outcome::Continue(HELP.to_string())),
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue(render_table(
        session.snapshot(),
        &session.hierarchy(),
        &config.display,
    )))
}
