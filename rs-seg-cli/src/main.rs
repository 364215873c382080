//! rs-seg - train and evaluate character n-gram word-boundary models.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;

use rs_seg_core::{SegError, Trie};
use rs_seg_core::config::{EvaluationConfig, TrainingConfig};
use rs_seg_core::io::open_rows;
use rs_seg_core::model::evaluation::{Metrics, evaluate};
use rs_seg_core::model::training::{prune_and_report, train};

#[derive(Parser)]
#[command(name = "rs-seg")]
#[command(version)]
#[command(about = "Learn where word boundaries belong from character n-grams", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Train a model on CSV rows (text in field 1) and write it out
	Train {
		/// Training rows (.csv, no header)
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Maximum window depth; contexts span up to DEPTH + 1 characters
		#[arg(value_name = "DEPTH")]
		depth: usize,

		/// Reverse every row before training (suffix-oriented model)
		#[arg(short, long)]
		reverse: bool,

		/// Model file to write (stdout when omitted)
		#[arg(short, long, value_name = "OUTPUT")]
		output: Option<PathBuf>,
	},

	/// Score a model against labeled CSV rows
	Eval {
		/// Labeled rows (.csv, no header)
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Model file written by `train`
		#[arg(value_name = "MODEL")]
		model: PathBuf,

		/// Reverse every row before scoring (must match training)
		#[arg(short, long)]
		reverse: bool,

		/// Print one line of 0/1 boundary decisions per row
		#[arg(short, long)]
		decisions: bool,
	},
}

fn run_train(input: PathBuf, depth: usize, reverse: bool, output: Option<PathBuf>) -> rs_seg_core::Result<()> {
	let mut config = TrainingConfig::new(depth)?;
	config.reverse = reverse;

	let mut trie = train(open_rows(&input)?, &config)?;
	prune_and_report(&mut trie);

	match output {
		Some(path) => {
			trie.save_file(&path)?;
			info!("Model written to {}", path.display());
		}
		None => trie.save(BufWriter::new(io::stdout().lock()))?,
	}
	Ok(())
}

fn run_eval(input: PathBuf, model: PathBuf, reverse: bool, decisions: bool) -> rs_seg_core::Result<()> {
	let trie = Trie::load_file(&model)?;
	info!("Loaded {} ({} nodes)", model.display(), trie.node_count());

	let config = EvaluationConfig { reverse, emit_decisions: decisions, ..EvaluationConfig::default() };
	let mut out = BufWriter::new(io::stdout().lock());
	let mut write_error = None;
	let metrics = evaluate(&trie, open_rows(&input)?, &config, |score| {
		if decisions && write_error.is_none() {
			if let Err(e) = writeln!(out, "{}", score.decision_line()) {
				write_error = Some(e);
			}
		}
	})?;
	if let Some(e) = write_error {
		return Err(e.into());
	}

	info!("{}", totals_line(&metrics));
	writeln!(out, "Precision: {:.6}", metrics.precision())?;
	writeln!(out, "Recall: {:.6}", metrics.recall())?;
	out.flush()?;
	Ok(())
}

/// Boundary counts behind the averaged scores.
fn totals_line(metrics: &Metrics) -> String {
	let (wins, fails, real) = metrics.totals();
	format!("{} rows: {wins} correct splits, {fails} wrong splits, {real} real boundaries", metrics.rows())
}

/// Fatal errors bypass the logger and always reach stderr.
fn report<W: Write>(mut out: W, err: &SegError) {
	let _ = writeln!(out, "Error: {err}");
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let result = match cli.command {
		Commands::Train { input, depth, reverse, output } => run_train(input, depth, reverse, output),
		Commands::Eval { input, model, reverse, decisions } => run_eval(input, model, reverse, decisions),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			report(io::stderr().lock(), &e);
			ExitCode::FAILURE
		}
	}
}
