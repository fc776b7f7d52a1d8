pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "freshet")]
#[command(about = "Forward new blog posts from RSS/Atom feeds to Discord channels", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll every channel's feeds once and deliver new items
    Run,
    /// Subscribe a channel to a feed
    Add {
        /// Discord channel id
        channel_id: String,
        /// URL of the feed to subscribe
        url: String,
    },
    /// Unsubscribe a feed by list number, blog name, or URL
    Remove {
        /// Discord channel id
        channel_id: String,
        /// List number, blog name, or feed URL
        identifier: String,
    },
    /// List a channel's subscriptions
    List {
        /// Discord channel id
        channel_id: String,
    },
}
