// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 The gitbook2mkdocs contributors

//! Command-line interface for gitbook2mkdocs.
//!
//! This binary provides the `clean` and `nav` subcommands used when moving
//! a GitBook export into an MkDocs project.

use gitbook2mkdocs::{cleaner, nav};
use lexopt::prelude::*;
use snafu::{ensure, prelude::*};
use std::path::{Path, PathBuf};

const DEFAULT_DOCS_DIR: &str = "docs";
const DEFAULT_SUMMARY: &str = "docs/SUMMARY.md";

/// What to run, with the options that apply to it.
enum Command {
    /// Rewrite GitBook markup in place.
    Clean { root: PathBuf, dry_run: bool },
    /// Print the MkDocs navigation for a summary file.
    Nav { summary: PathBuf, json: bool },
}

struct Cli {
    command: Command,
    quiet: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("missing command (expected `clean` or `nav`)"))]
    MissingCommand,

    #[snafu(display("unknown command `{name}` (expected `clean` or `nav`)"))]
    UnknownCommand { name: String },

    #[snafu(display("`{command}` takes at most one path"))]
    TooManyPaths { command: &'static str },

    #[snafu(display("{flag} cannot be used with `{command}`"))]
    FlagNotApplicable {
        flag: &'static str,
        command: &'static str,
    },

    #[snafu(display("failed to clean {}: {source}", path.display()))]
    Clean {
        path: PathBuf,
        source: cleaner::CleanError,
    },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadSummary {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to build navigation from {}: {source}", path.display()))]
    BuildNav {
        path: PathBuf,
        source: nav::NavError,
    },

    #[snafu(display("failed to render navigation for {}: {source}", path.display()))]
    RenderNav {
        path: PathBuf,
        source: nav::NavError,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert GitBook markdown exports into MkDocs-ready docs and navigation

Usage: {name} <COMMAND> [OPTIONS] [PATH]

Commands:
  clean [DIR]       Rewrite GitBook markup in every .md file under DIR (default: {docs})
  nav [SUMMARY]     Print an MkDocs nav block built from SUMMARY (default: {summary})

Options:
  -n, --dry-run     (clean) Report files that would change without writing them
      --json        (nav) Print the navigation as JSON instead of YAML
  -q, --quiet       Suppress progress messages
  -h, --help        Print help
  -V, --version     Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        docs = DEFAULT_DOCS_DIR,
        summary = DEFAULT_SUMMARY,
    );
}

fn parse_args() -> Result<Cli, Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut positional: Vec<String> = Vec::new();
    let mut dry_run = false;
    let mut json = false;
    let mut quiet = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next().context(ParseArgsSnafu)? {
        match arg {
            Short('n') | Long("dry-run") => dry_run = true,
            Long("json") => json = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => positional.push(val.string().context(ParseArgsSnafu)?),
            _ => return Err(arg.unexpected()).context(ParseArgsSnafu),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().context(MissingCommandSnafu)?;
    let path = positional.next().map(PathBuf::from);

    let command = match name.as_str() {
        "clean" => {
            ensure!(positional.next().is_none(), TooManyPathsSnafu { command: "clean" });
            ensure!(
                !json,
                FlagNotApplicableSnafu {
                    flag: "--json",
                    command: "clean"
                }
            );
            Command::Clean {
                root: path.unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR)),
                dry_run,
            }
        }
        "nav" => {
            ensure!(positional.next().is_none(), TooManyPathsSnafu { command: "nav" });
            ensure!(
                !dry_run,
                FlagNotApplicableSnafu {
                    flag: "--dry-run",
                    command: "nav"
                }
            );
            Command::Nav {
                summary: path.unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY)),
                json,
            }
        }
        _ => return UnknownCommandSnafu { name }.fail(),
    };

    Ok(Cli { command, quiet })
}

fn main() -> Result<(), Error> {
    let cli = parse_args()?;

    match &cli.command {
        Command::Clean { root, dry_run } => run_clean(root, *dry_run, cli.quiet),
        Command::Nav { summary, json } => run_nav(summary, *json),
    }
}

/// Cleans every markdown file under `root` and prints a summary line.
fn run_clean(root: &Path, dry_run: bool, quiet: bool) -> Result<(), Error> {
    let mode = if dry_run {
        cleaner::CleanMode::DryRun
    } else {
        cleaner::CleanMode::Write
    };
    let report = cleaner::clean_dir(root, mode).context(CleanSnafu { path: root })?;

    if !quiet {
        for path in &report.changed {
            if dry_run {
                eprintln!("Would update {}", path.display());
            } else {
                eprintln!("Updated {}", path.display());
            }
        }
    }

    let (changed, scanned) = report.counts();
    if dry_run {
        println!("Done. Would update {changed} file(s) out of {scanned}.");
    } else {
        println!("Done. Updated {changed} file(s) out of {scanned}.");
    }
    Ok(())
}

/// Prints the navigation for `summary` on stdout.
fn run_nav(summary: &Path, json: bool) -> Result<(), Error> {
    let text = std::fs::read_to_string(summary).context(ReadSummarySnafu { path: summary })?;

    let entries = nav::parse_summary(&text);
    let tree = nav::build_nav(&entries).context(BuildNavSnafu { path: summary })?;
    let rendered = if json {
        nav::render_json(&tree).context(RenderNavSnafu { path: summary })?
    } else {
        nav::render_yaml(&tree)
    };

    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_is_not_reported_as_build_failure() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::RenderNav {
            path: PathBuf::from(DEFAULT_SUMMARY),
            source: nav::NavError::Json { source },
        };

        let message = err.to_string();
        assert!(
            message.starts_with("failed to render navigation for docs/SUMMARY.md: "),
            "Unexpected message: {message}"
        );
    }
}
