use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "viva", about = "Viva - spoken practice answers, scored")]
pub struct CliArgs {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Enable debug mode with verbose logging
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available audio input devices
    Devices,

    /// Record a spoken answer and score it against a reference text
    Practice {
        /// Reference answer to score against
        #[arg(long)]
        reference: String,

        /// Question title shown before recording
        #[arg(long)]
        question: Option<String>,

        /// Save the recorded audio as a WAV file
        #[arg(long)]
        save_wav: Option<PathBuf>,
    },

    /// Score two texts against each other without recording
    Score { a: String, b: String },
}
