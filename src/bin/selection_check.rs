//! Selection Checker CLI
//!
//! Validates a configured-source list (the JSON the entity layer serves)
//! and dry-runs source selection against it: resolves display names,
//! prints the capability-filtered views, and compiles every
//! `selectionCommands` entry into the payload that would go to the wire.
//!
//! Usage:
//!   selection-check <sources-json-file>
//!   selection-check --stdin
//!
//! Exit codes: 0 ok, 1 I/O or JSON error, 2 usage,
//! 3 selection entries that resolve to no compiled command.

// Dev tool - allow unwrap for CLI simplicity
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use beolink_bridge::commands::{parse_selection_command, CommandArg, CommandSet};
use beolink_bridge::sources::{filter_sources, Capability, ConfiguredSource};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "beolink_bridge=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        print_usage();
        process::exit(2);
    }

    let json = match args[1].as_str() {
        "--stdin" => read_stdin(),
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        path => match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                process::exit(1);
            }
        },
    };

    let sources: Vec<ConfiguredSource> = match serde_json::from_str(&json) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("INVALID: JSON parse error: {}", e);
            process::exit(1);
        }
    };

    println!("{} configured source(s)", sources.len());
    for source in &sources {
        let hidden = if source.hidden { " [hidden]" } else { "" };
        println!("  {} = {}{}", source.id, source.display_name(), hidden);
    }

    let video = filter_sources(&sources, Capability::Video);
    let audio = filter_sources(&sources, Capability::Audio);
    println!();
    println!(
        "video view: {:?}",
        video.iter().map(|s| s.id.as_str()).collect::<Vec<_>>()
    );
    println!(
        "audio view: {:?}",
        audio.iter().map(|s| s.id.as_str()).collect::<Vec<_>>()
    );

    let mut unresolved = 0usize;
    for source in &sources {
        if source.selection_commands.is_empty() {
            continue;
        }
        println!();
        println!("source {} selection dry-run:", source.id);
        let Some(set) = CommandSet::compile(source) else {
            println!("  (no resource; source is not configured for control)");
            unresolved += source.selection_commands.len();
            continue;
        };
        for entry in &source.selection_commands {
            let parsed = parse_selection_command(entry);
            match parsed.command() {
                Some(name) => {
                    let payload = set.build(name, Some(&CommandArg::Payload(parsed.params)));
                    println!("  {} -> {} {}", entry, name, payload);
                }
                None => {
                    println!("  {} -> UNRESOLVED (key {:?})", entry, parsed.key);
                    unresolved += 1;
                }
            }
        }
    }

    if unresolved > 0 {
        eprintln!();
        eprintln!("{} selection entr(ies) resolve to no compiled command", unresolved);
        process::exit(3);
    }
}

fn print_usage() {
    eprintln!("Selection Checker - validate a configured-source list and dry-run selection");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  selection-check <sources-json-file>");
    eprintln!("  selection-check --stdin");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  selection-check sources.json");
    eprintln!("  echo '[{{\"id\":\"F0:128\",\"resource\":\"renderer/living\"}}]' | selection-check --stdin");
}

fn read_stdin() -> String {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .expect("Failed to read stdin");
    input
}
