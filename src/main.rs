// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;
use ntdist::cli::Config;
use ntdist::core::pairwise_comparisons;
use ntdist::data::load_weights;
use ntdist::output::{is_stdout, write_matrix_to};
use ntdist::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        eprintln!("💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    if args.list_models {
        println!("Available models:");
        for (name, description) in ModelRegistry::new().list_models() {
            println!("  - {}: {}", name, description);
        }
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
        eprintln!("📄 Loaded configuration from: {}", config_path);
    }

    eprintln!("🚀 ntdist v{}", ntdist::VERSION);

    // Validate all arguments before touching the inputs
    let validation = validate_args(&args)?;
    let model = validation.model.as_ref();

    eprintln!("🧬 Model: {} ({})", model.name(), model.description());
    eprintln!("📐 Rates: {}", validation.rates);
    if model.remove_gaps() {
        eprintln!("✂️  Removing gap columns");
    }
    if validation.gap_count != GapCountMode::Ignore {
        if model.name() == "pdist" {
            eprintln!("➖ Gap counting: {}", validation.gap_count.description());
        } else {
            eprintln!("⚠️  --count-gap-mutations only applies to pdist, ignored");
        }
    }
    eprintln!("🧵 Threads: {}", validation.engine.threads());

    let total_start = Instant::now();

    // Load the alignment and optional site weights
    let alignment_path = args.alignment.as_deref().unwrap_or_default();
    let alignment = Alignment::from_fasta(Path::new(alignment_path))?;
    eprintln!(
        "📂 Loaded {} sequences × {} sites from {}",
        alignment.n_sequences(),
        alignment.length(),
        alignment_path
    );

    let weights = match &args.weights {
        Some(path) => {
            let weights = load_weights(Path::new(path))?;
            eprintln!("⚖️  Loaded {} site weights from {}", weights.len(), path);
            Some(weights)
        }
        None => None,
    };

    // Estimate model parameters once, then share the frozen model
    let fitted = model.init_model(&alignment, weights.as_deref(), validation.rates)?;
    eprintln!(
        "🔍 Selected sites: {} of {} (weighted: {})",
        fitted.selection().count(),
        alignment.length(),
        fitted.selection().num_sites()
    );
    if let Some([a, c, g, t]) = fitted.frequencies() {
        eprintln!("📊 Base frequencies: A={:.4} C={:.4} G={:.4} T={:.4}", a, c, g, t);
    }

    let n = alignment.n_sequences();
    eprintln!(
        "🔄 Computing distance matrix ({} sequences, {} pairwise comparisons)...",
        n,
        pairwise_comparisons(n)
    );
    let start = Instant::now();
    let matrix = validation
        .engine
        .compute_matrix(&alignment, weights.as_deref(), fitted.as_ref())?;
    eprintln!("✅ Distance matrix computed in {:.2}s", start.elapsed().as_secs_f64());

    write_matrix_to(&validation.output, validation.format, &matrix, &command_line)?;
    if is_stdout(&validation.output) {
        eprintln!("📁 Output written to: stdout ({} format)", validation.format);
    } else {
        eprintln!("📁 Output written to: {} ({} format)", validation.output, validation.format);
    }

    eprintln!("🎉 Completed in {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}
