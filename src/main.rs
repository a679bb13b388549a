use clap::{Parser, Subcommand};
use prbot::export;
use prbot::prelude::*;
use std::path::PathBuf;

/// Classify archived pull request events by change category
#[derive(Parser, Debug)]
#[command(name = "prbot")]
#[command(about = "Classify archived pull request events and tally outcomes per label")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a folder of archived event CSV files
    Run {
        /// Directory containing archived event CSV files
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the record table CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Label policy: multi (every matching label) or single (first match)
        #[arg(long, default_value = "multi", value_parser = ["multi", "single"])]
        policy: String,

        /// Relevance filter scope: off, body, or full (title+body+comments)
        #[arg(long, default_value = "full", value_parser = ["off", "body", "full"])]
        relevance: String,

        /// Re-wrap normalized title and body text at this width
        #[arg(long)]
        rewrap: Option<usize>,

        /// Rescale summary percentages so the cross-label sum is exactly 100
        #[arg(long)]
        rescale: bool,

        /// Limit number of extracted records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the label taxonomy in match order
    Labels,
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  run     Process a folder of archived event CSV files");
    println!("  labels  List the label taxonomy in match order");
}

async fn run_command(cmd: Command) -> anyhow::Result<()> {
    let Command::Run {
        input,
        output,
        policy,
        relevance,
        rewrap,
        rescale: rescale_flag,
        limit,
    } = cmd
    else {
        unreachable!()
    };

    let mut builder = ConfigBuilder::new(&input)
        .policy_str(&policy)
        .relevance_str(&relevance)
        .rescale(rescale_flag);

    if let Some(width) = rewrap {
        builder = builder.rewrap_width(width);
    }

    if let Some(limit) = limit {
        builder = builder.limit(limit);
    }

    let config = builder.build()?;

    let taxonomy = Taxonomy::default();
    let mut counts = AggregateCounts::new(&taxonomy);
    let mut records: Vec<PullRequestRecord> = Vec::new();
    let mut errors = 0usize;

    let processor = BatchProcessor::new(config.clone());
    let mut stream = processor.process();

    while let Some(result) = stream.next().await {
        match result {
            Ok(record) => {
                counts.update(&record.labels, &record.state, record.merged);
                records.push(record);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                errors += 1;
            }
        }
    }

    if errors > 0 {
        eprintln!("Encountered {} errors while reading source files", errors);
    }

    if let Some(output) = &output {
        export::write_records_csv(output, &records)?;
        eprintln!("Wrote {} records to {}", records.len(), output.display());
    }

    let mut shares = counts.finalize();
    if config.rescale {
        rescale(&mut shares);
    }

    print!("{}", export::render_summary(&counts, &shares));

    Ok(())
}

fn run_labels_command() {
    let taxonomy = Taxonomy::default();
    println!("Label taxonomy (match order):");
    for rule in &taxonomy.rules {
        println!("  {} ({} keyword phrases)", rule.label, rule.keywords.len());
    }
    println!("  {} (fallback)", taxonomy.fallback);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Some(cmd @ Command::Run { .. }) => run_command(cmd).await,
        Some(Command::Labels) => {
            run_labels_command();
            Ok(())
        }
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
