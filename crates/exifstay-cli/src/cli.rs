//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use exifstay_session::KeywordOperation;

/// Reads and writes image metadata through a stay-open tool session.
#[derive(Parser, Debug)]
#[command(name = "exifstay", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Metadata commands.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Prints all metadata of the files as a JSON array.
    Get {
        /// Files to read.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Prints one tag as JSON; exits with status 1 when it is absent.
    Tag {
        /// Tag name, optionally group-qualified (for example `XMP:Subject`).
        #[arg(value_name = "TAG")]
        tag: String,
        /// File to read.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Writes `TAG=VALUE` assignments in place.
    Set {
        /// File to modify.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Assignments such as `XMP:Subject=Rose`.
        #[arg(value_name = "TAG=VALUE", required = true)]
        assignments: Vec<String>,
    },
    /// Replaces, adds or removes keywords in place.
    Keywords {
        /// One of `replace`, `add` or `remove`.
        #[arg(value_name = "OPERATION")]
        operation: KeywordOperation,
        /// File to modify.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Keywords to apply.
        #[arg(value_name = "KEYWORD", required = true)]
        keywords: Vec<String>,
    },
    /// Copies every tag from one file to another.
    Copy {
        /// File to copy tags from.
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        /// File to copy tags into.
        #[arg(value_name = "TARGET")]
        target: PathBuf,
    },
    /// Prints the resolved path of the metadata tool.
    Which,
}
