use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tpgen")]
#[command(about = "Test plan document generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a test plan from an options file and a requirements corpus
    Generate {
        /// Path to the TOML options file
        #[arg(short = 'c', long)]
        options: PathBuf,

        /// Requirements file, or a directory of .txt/.md files
        #[arg(short, long)]
        requirements: PathBuf,

        /// Write the markdown document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model to generate with
        #[arg(short, long, default_value = "gpt-4o-mini")]
        model: String,
    },

    /// Print the default section catalog in generation order
    Sections,
}
