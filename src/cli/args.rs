//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Voicenote - voice-note recorder with live waveform and transcription
#[derive(Parser, Debug)]
#[command(name = "voicenote")]
#[command(version)]
#[command(about = "Record voice notes with a live waveform, streaming transcript, and crash recovery")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a voice note (Enter pauses/resumes, Ctrl-C stops)
    Record {
        /// Enable streaming transcription while recording
        #[arg(short = 'r', long)]
        realtime: bool,

        /// Translate segments into a target language (implies --realtime)
        #[arg(short = 't', long, value_name = "LANG")]
        translate: Option<String>,

        /// Stop automatically after this many seconds
        #[arg(short = 'm', long, value_name = "SECS")]
        max_secs: Option<u64>,
    },
    /// Check for a recording interrupted by a crash
    Recover {
        /// Discard the recovered draft instead of showing it
        #[arg(long)]
        discard: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
}
