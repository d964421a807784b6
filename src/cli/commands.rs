use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::indexer::load_unified_index;
use crate::logging::init_logging;
use crate::models::{ConversationMetadata, Platform};
use crate::pipeline::{
    DEFAULT_CONCURRENCY, DEFAULT_PROGRESS_INTERVAL, PipelineConfig, RunSummary, TransformConfig,
    run_transform,
};
use crate::utils::format_path_with_tilde;

/// Topics listed by `stats`
const TOP_TOPICS: usize = 10;

#[derive(Parser)]
#[command(name = "chat-export-transformer")]
#[command(version = "0.1.0")]
#[command(about = "Turn Claude and ChatGPT exports into per-conversation JSON files and indexes", long_about = None)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert exports found under the input folder
    Transform {
        /// Folder containing claude*/ and chat-gpt*/ export directories
        #[arg(short, long, default_value = "raw")]
        input: PathBuf,

        /// Folder to write conversations and indexes to
        #[arg(short, long, default_value = "expanded")]
        output: PathBuf,

        /// Worker threads
        #[arg(short, long, env = "CHAT_TRANSFORMER_WORKERS", default_value_t = DEFAULT_CONCURRENCY)]
        workers: usize,

        /// Which exports to transform
        #[arg(short, long, value_enum, default_value_t = PlatformArg::Both)]
        platform: PlatformArg,

        /// Log progress every N conversations
        #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
        progress_every: usize,

        /// Log conversations that take longer than this many milliseconds
        #[arg(long)]
        slow_item_ms: Option<u64>,
    },
    /// Show statistics about a transformed output folder
    Stats {
        #[arg(short, long, default_value = "expanded")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Both,
    Claude,
    Chatgpt,
}

impl PlatformArg {
    fn platforms(self) -> Vec<Platform> {
        match self {
            PlatformArg::Both => Platform::ALL.to_vec(),
            PlatformArg::Claude => vec![Platform::Claude],
            PlatformArg::Chatgpt => vec![Platform::ChatGpt],
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Transform { input, output, workers, platform, progress_every, slow_item_ms }) => {
            let config = TransformConfig {
                input,
                output,
                platforms: platform.platforms(),
                pipeline: PipelineConfig {
                    concurrency: workers,
                    progress_interval: progress_every,
                    slow_item_threshold: slow_item_ms.map(Duration::from_millis),
                },
            };
            let summary = run_transform(&config)?;
            print_summary(&summary, &config.output);
        }
        Some(Commands::Stats { output }) => {
            show_stats(&output)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary, output: &Path) {
    println!("Transformation Summary");
    println!("================================");
    for report in &summary.platforms {
        println!(
            "{}: {}/{} conversations, {} messages, {} failed, {} warnings",
            report.platform.assistant_label(),
            report.persisted,
            report.total,
            report.messages,
            report.failures.len(),
            report.warnings
        );
        if report.projects > 0 {
            println!("  projects: {}, documents: {}", report.projects, report.documents);
        }
    }
    println!();
    println!("Indexed conversations: {}", summary.indexed);
    println!("Output directory: {}", format_path_with_tilde(output));
    println!("Duration: {:.2}s", summary.duration_secs);
}

fn show_stats(output: &Path) -> Result<()> {
    let conversations = load_unified_index(output)?;

    println!("Chat Export Statistics");
    println!("================================");
    println!("Total conversations: {}", conversations.len());
    for platform in Platform::ALL {
        let count = conversations.iter().filter(|c| c.platform == platform).count();
        println!("  {}: {}", platform.assistant_label(), count);
    }
    let messages: usize = conversations.iter().map(|c| c.message_count).sum();
    println!("Total messages: {}", messages);
    println!();
    println!("Output directory: {}", format_path_with_tilde(output));

    let topics = top_topics(&conversations, TOP_TOPICS);
    if !topics.is_empty() {
        println!();
        println!("Top topics:");
        for (topic, count) in topics {
            println!("  {}: {}", topic, count);
        }
    }

    let mut dates = conversations.iter().filter_map(|c| c.created_date);
    if let Some(first) = dates.next() {
        let (oldest, newest) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        println!();
        println!("Oldest conversation: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
        println!("Newest conversation: {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}

/// Most common topics, ties broken alphabetically
fn top_topics(conversations: &[ConversationMetadata], limit: usize) -> Vec<(&str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for topic in conversations.iter().flat_map(|c| &c.topics) {
        *counts.entry(topic.as_str()).or_default() += 1;
    }

    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort over alphabetical input keeps ties alphabetical
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
