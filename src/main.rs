//! linkroute: connectivity checks over named location relations
//!
//! Usage: linkroute <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use env_logger::Env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use linkroute::commands::generate::parse_count;
use linkroute::commands::{GenerateCommand, GroupsCommand, QueryCommand};
use linkroute::relations::RouteError;

#[derive(Parser)]
#[command(name = "linkroute")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "linkroute: check whether two locations are connected by a chain of relations", long_about = None)]
struct Cli {
    /// Keep a final record that has no trailing newline. By default such a
    /// fragment is dropped with a warning, since only newline-terminated
    /// records are relations.
    #[arg(long, global = true)]
    keep_unterminated: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a route exists between two locations
    Query {
        /// Input relation file, one `from,to` per line (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// First location
        from: String,

        /// Second location
        to: String,

        /// Print ingestion statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// List every group of connected locations
    Groups {
        /// Input relation file, one `from,to` per line (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Prefix each group with its member count
        #[arg(short = 'c', long)]
        count: bool,

        /// Print ingestion statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Generate a synthetic relation file
    Generate {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of relations (e.g., 500, 10K, 1M)
        #[arg(short = 'n', long, default_value = "1K", value_parser = parse_count_arg)]
        relations: u64,

        /// Number of distinct locations
        #[arg(short = 'l', long, default_value = "200", value_parser = parse_count_arg)]
        locations: u64,

        /// Number of disjoint clusters
        #[arg(short = 'k', long, default_value = "1")]
        clusters: u64,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },
}

fn parse_count_arg(s: &str) -> Result<u64, String> {
    parse_count(s).ok_or_else(|| format!("invalid count '{}'", s))
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Must be set before any reader is created
    if cli.keep_unterminated {
        linkroute::config::set_keep_unterminated(true);
    }

    let result = match cli.command {
        Commands::Query {
            input,
            from,
            to,
            stats,
        } => run_query(input, &from, &to, stats),

        Commands::Groups {
            input,
            count,
            stats,
        } => run_groups(input, count, stats),

        Commands::Generate {
            output,
            relations,
            locations,
            clusters,
            seed,
            force,
        } => run_generate(output, relations, locations, clusters, seed, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// Returns the input path unless it is absent or `-` (stdin).
fn file_input(input: &Option<PathBuf>) -> Option<&Path> {
    input.as_deref().filter(|path| path.to_string_lossy() != "-")
}

fn run_query(
    input: Option<PathBuf>,
    from: &str,
    to: &str,
    stats: bool,
) -> Result<(), RouteError> {
    let cmd = QueryCommand::new();
    let (outcome, ingest_stats) = match file_input(&input) {
        Some(path) => cmd.run(path, from, to)?,
        None => cmd.run_stdin(from, to)?,
    };

    if stats {
        eprintln!("Ingest stats: {}", ingest_stats);
    }
    println!("{}", outcome);
    Ok(())
}

fn run_groups(input: Option<PathBuf>, count: bool, stats: bool) -> Result<(), RouteError> {
    let cmd = GroupsCommand::new().with_count(count);
    let stdout = io::stdout();
    let handle = stdout.lock();

    let ingest_stats = match file_input(&input) {
        Some(path) => cmd.run(path, handle)?,
        None => cmd.run_stdin(handle)?,
    };

    if stats {
        eprintln!("Ingest stats: {}", ingest_stats);
    }
    Ok(())
}

fn run_generate(
    output: Option<PathBuf>,
    relations: u64,
    locations: u64,
    clusters: u64,
    seed: u64,
    force: bool,
) -> Result<(), RouteError> {
    let cmd = GenerateCommand::new()
        .with_relations(relations)
        .with_locations(locations)
        .with_clusters(clusters)
        .with_seed(seed);

    let stats = match output {
        Some(path) => {
            if path.exists() && !force {
                return Err(RouteError::InvalidArgument(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            let file = File::create(&path)?;
            let stats = cmd.run(file)?;
            eprintln!("Wrote {} to {}", stats, path.display());
            stats
        }
        None => {
            let stdout = io::stdout();
            cmd.run(stdout.lock())?
        }
    };

    log::debug!("Generate finished: {}", stats);
    Ok(())
}
