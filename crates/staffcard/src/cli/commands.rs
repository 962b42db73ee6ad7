//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{EmployeePatch, NewEmployee};

/// Employee fields accepted by `add` and `update`.
#[derive(Debug, Clone, Default, Args)]
pub struct EmployeeFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Role label
    #[arg(long)]
    pub position: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Avatar URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// `LinkedIn` profile URL
    #[arg(long)]
    pub linkedin_link: Option<String>,

    /// Short biography
    #[arg(long)]
    pub bio: Option<String>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show employees whose name or position contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Employee id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Use this id instead of generating one
    #[arg(long)]
    pub id: Option<String>,

    /// Field values; anything omitted gets its default
    #[command(flatten)]
    pub fields: EmployeeFields,
}

/// Update command arguments.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Employee id
    pub id: String,

    /// Field values to change; anything omitted is kept
    #[command(flatten)]
    pub fields: EmployeeFields,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Employee id
    pub id: String,
}

/// Seed command arguments.
#[derive(Debug, Args)]
pub struct SeedCommand {
    /// Number of records to request (defaults to the configured quantity)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Replace existing records instead of seeding only an empty directory
    #[arg(long)]
    pub force: bool,

    /// Read a generator payload (`{"data": [...]}`) from this file instead
    /// of calling the remote endpoint
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,
}

/// Card command arguments.
#[derive(Debug, Args)]
pub struct CardCommand {
    /// Employee id
    pub id: String,

    /// Write the vCard here; a directory gets `<Name>.vcf` inside it
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One employee per line
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
}

impl From<AddCommand> for NewEmployee {
    fn from(cmd: AddCommand) -> Self {
        let EmployeeFields {
            name,
            position,
            phone,
            email,
            image_url,
            linkedin_link,
            bio,
        } = cmd.fields;
        Self {
            id: cmd.id,
            name,
            position,
            phone,
            email,
            image_url,
            linkedin_link,
            bio,
        }
    }
}

impl From<EmployeeFields> for EmployeePatch {
    fn from(fields: EmployeeFields) -> Self {
        Self {
            name: fields.name,
            position: fields.position,
            phone: fields.phone,
            email: fields.email,
            image_url: fields.image_url,
            linkedin_link: fields.linkedin_link,
            bio: fields.bio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_command_into_draft() {
        let cmd = AddCommand {
            id: Some("7".to_string()),
            fields: EmployeeFields {
                name: Some("Ann".to_string()),
                bio: Some("Hi".to_string()),
                ..EmployeeFields::default()
            },
        };

        let draft = NewEmployee::from(cmd);
        assert_eq!(draft.id.as_deref(), Some("7"));
        assert_eq!(draft.name.as_deref(), Some("Ann"));
        assert_eq!(draft.bio.as_deref(), Some("Hi"));
        assert!(draft.position.is_none());
    }

    #[test]
    fn test_fields_into_patch() {
        let patch = EmployeePatch::from(EmployeeFields {
            position: Some("Lead".to_string()),
            ..EmployeeFields::default()
        });

        assert_eq!(patch.position.as_deref(), Some("Lead"));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(EmployeePatch::from(EmployeeFields::default()).is_empty());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
