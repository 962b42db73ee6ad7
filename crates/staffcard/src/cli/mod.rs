//! Command-line interface for staffcard.
//!
//! This module provides the CLI structure for the `staffcard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, CardCommand, ConfigCommand, EmployeeFields, ListCommand, OutputFormat,
    RemoveCommand, SeedCommand, ShowCommand, StatusCommand, UpdateCommand,
};

use crate::logging::Verbosity;

/// staffcard - Employee directory and digital business cards
///
/// Keeps a local directory of employee records, seeds it from a
/// synthetic-person generator on first use, and exports each entry as a
/// vCard.
#[derive(Debug, Parser)]
#[command(name = "staffcard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List employees
    List(ListCommand),

    /// Show one employee
    Show(ShowCommand),

    /// Add an employee
    Add(AddCommand),

    /// Update fields of an employee
    Update(UpdateCommand),

    /// Remove an employee
    Remove(RemoveCommand),

    /// Seed the directory from the remote generator
    Seed(SeedCommand),

    /// Export an employee's business card as a vCard
    Card(CardCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "staffcard");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["staffcard", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(
            parse(&["staffcard", "-v", "list"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(
            parse(&["staffcard", "-vv", "list"]).verbosity(),
            Verbosity::Trace
        );
        assert_eq!(
            parse(&["staffcard", "-q", "list"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_list_with_search() {
        let cli = parse(&["staffcard", "list", "--search", "eng", "-f", "json"]);
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.search.as_deref(), Some("eng"));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_list_defaults_to_table() {
        match parse(&["staffcard", "list"]).command {
            Command::List(cmd) => assert_eq!(cmd.format, OutputFormat::default()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "staffcard",
            "add",
            "--name",
            "Ann",
            "--position",
            "Lead",
            "--linkedin-link",
            "https://linkedin.com/in/ann",
        ]);
        match cli.command {
            Command::Add(cmd) => {
                assert!(cmd.id.is_none());
                assert_eq!(cmd.fields.name.as_deref(), Some("Ann"));
                assert_eq!(cmd.fields.position.as_deref(), Some("Lead"));
                assert_eq!(
                    cmd.fields.linkedin_link.as_deref(),
                    Some("https://linkedin.com/in/ann")
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_update() {
        let cli = parse(&["staffcard", "update", "17-3", "--bio", "New bio"]);
        match cli.command {
            Command::Update(cmd) => {
                assert_eq!(cmd.id, "17-3");
                assert_eq!(cmd.fields.bio.as_deref(), Some("New bio"));
                assert!(cmd.fields.name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_seed() {
        let cli = parse(&["staffcard", "seed", "-n", "5", "--force"]);
        match cli.command {
            Command::Seed(cmd) => {
                assert_eq!(cmd.count, Some(5));
                assert!(cmd.force);
                assert!(cmd.from.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_card_with_output() {
        let cli = parse(&["staffcard", "card", "1", "-o", "/tmp/cards"]);
        match cli.command {
            Command::Card(cmd) => {
                assert_eq!(cmd.id, "1");
                assert_eq!(cmd.output, Some(PathBuf::from("/tmp/cards")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["staffcard", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_remove_requires_id() {
        assert!(Cli::try_parse_from(["staffcard", "remove"]).is_err());
    }
}
