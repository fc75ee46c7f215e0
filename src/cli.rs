use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eve-dogma-compiler")]
#[command(version, about = "Repair the EVE Online SDE dogma graph and compile it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, fix up, validate and compile
    Compile {
        /// Directory containing the JSONL export
        input_dir: PathBuf,

        /// Resource file to write
        output: PathBuf,
    },

    /// Load, fix up and validate without writing anything
    Check {
        /// Directory containing the JSONL export
        input_dir: PathBuf,
    },

    /// Decode a compiled resource and print its section counts
    Inspect {
        /// Compiled resource file
        file: PathBuf,
    },

    /// List the fixup passes in pipeline order
    ListFixups,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
