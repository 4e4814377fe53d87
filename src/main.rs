use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use arbor_id3::{Catalog, Classifier, Dataset, Evaluation, HoldoutSplit, TreeDocument, train};
use arbor_io::{
    CatalogReader, ExperimentName, InstanceReader, ResultWriter, StatisticsReport,
};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "ID3 decision tree induction and evaluation for categorical data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Inputs and output naming shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Path to the names file declaring attributes and class values
    #[arg(long)]
    names: PathBuf,

    /// Path to the labelled training CSV file
    #[arg(long)]
    data: PathBuf,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Induce a tree from every labelled row and export it
    Train {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Hold out part of the data, train on the rest and report precision/recall/F1
    Evaluate {
        #[command(flatten)]
        input: InputArgs,

        /// Fraction of each class held out for testing
        #[arg(long, default_value_t = 0.3)]
        test_fraction: f64,
    },

    /// Train on all labelled rows and classify the rows of a query file
    Classify {
        #[command(flatten)]
        input: InputArgs,

        /// Path to the query CSV file (class column optional)
        #[arg(long)]
        query: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct TrainOutput {
    experiment: String,
    n_instances: usize,
    n_attributes: usize,
    n_classes: usize,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    root_attribute: Option<String>,
}

#[derive(Serialize)]
struct EvaluateOutput {
    experiment: String,
    n_train: usize,
    n_test: usize,
    test_fraction: f64,
    accuracy: f64,
    macro_f1: f64,
    weighted_f1: f64,
    n_unclassified: usize,
    n_nodes: usize,
}

#[derive(Serialize)]
struct ClassifyOutput {
    experiment: String,
    n_queries: usize,
    n_unclassified: usize,
    n_nodes: usize,
}

/// Read the catalog and the labelled rows named by `input`.
fn load(input: &InputArgs) -> Result<(Catalog, Dataset)> {
    let catalog = CatalogReader::new(&input.names)
        .read()
        .context("failed to read names file")?;
    let dataset = InstanceReader::new(&input.data)
        .read(&catalog)
        .context("failed to read training CSV")?;
    Ok((catalog, dataset))
}

/// Write the JSON and text renditions of `tree`.
fn export_tree(writer: &ResultWriter, tree: &Classifier, catalog: &Catalog) -> Result<()> {
    let document = TreeDocument::build(tree, catalog).context("failed to label tree")?;
    writer.write_tree(tree, &document)?;
    writer.write_tree_text(&document)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train { input } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;

            // 1. Read inputs
            let (catalog, dataset) = load(&input)?;

            // 2. Train on every row
            let tree = train(&catalog, &dataset).context("training failed")?;

            // 3. Write tree artifacts
            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            export_tree(&writer, &tree, &catalog)?;

            // 4. Print summary
            let output = TrainOutput {
                experiment: input.experiment,
                n_instances: dataset.n_instances(),
                n_attributes: catalog.n_attributes(),
                n_classes: catalog.n_classes(),
                n_nodes: tree.n_nodes(),
                n_leaves: tree.n_leaves(),
                depth: tree.depth(),
                root_attribute: tree
                    .root()
                    .split_attribute()
                    .and_then(|a| catalog.attribute(a))
                    .map(|a| a.name().to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Evaluate {
            input,
            test_fraction,
        } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;

            // 1. Read inputs and split
            let (catalog, dataset) = load(&input)?;
            let holdout = HoldoutSplit::new(test_fraction)?
                .with_seed(cli.seed)
                .split(&dataset)
                .context("hold-out split failed")?;

            // 2. Train on the training partition
            let tree = train(&catalog, &holdout.train).context("training failed")?;

            // 3. Classify held-out rows and score them
            let evaluation =
                Evaluation::evaluate(&tree, &holdout.test).context("evaluation failed")?;
            let report = StatisticsReport::from_evaluation(&evaluation, &catalog)?;
            if !cli.quiet {
                eprintln!("{report}");
            }

            // 4. Write artifacts
            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            export_tree(&writer, &tree, &catalog)?;
            writer.write_report(&report, &evaluation)?;

            // 5. Print summary
            let output = EvaluateOutput {
                experiment: input.experiment,
                n_train: holdout.train.n_instances(),
                n_test: holdout.test.n_instances(),
                test_fraction,
                accuracy: report.accuracy,
                macro_f1: report.macro_average.f1,
                weighted_f1: report.weighted_average.f1,
                n_unclassified: report.n_unclassified,
                n_nodes: tree.n_nodes(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Classify { input, query } => {
            let experiment_name = ExperimentName::new(input.experiment.clone())?;

            // 1. Read inputs and train
            let (catalog, dataset) = load(&input)?;
            let tree = train(&catalog, &dataset).context("training failed")?;

            // 2. Read and classify queries
            let queries = InstanceReader::new(&query)
                .read_queries(&catalog)
                .context("failed to read query CSV")?;
            let predicted = queries
                .par_iter()
                .map(|q| tree.classify(&q.values))
                .collect::<Result<Vec<_>, _>>()
                .context("classification failed")?;
            let n_unclassified = predicted.iter().filter(|p| p.is_none()).count();
            info!(n_queries = queries.len(), n_unclassified, "queries classified");

            // 3. Write predictions
            let writer = ResultWriter::new(&input.output_dir, experiment_name)?;
            writer.write_predictions(&catalog, &queries, &predicted)?;

            // 4. Print summary
            let output = ClassifyOutput {
                experiment: input.experiment,
                n_queries: queries.len(),
                n_unclassified,
                n_nodes: tree.n_nodes(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
