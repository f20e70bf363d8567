use anyhow::{Context, Result};
use clap::Parser;
use fitts_analysis::{
    Analysis, CsvReportEmitter, DistanceBin, Regression, analyze, read_trial_log, report,
    write_reports,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fitts-law",
    version,
    about = "Fitts' Law analysis of a recorded trial log"
)]
struct Args {
    /// Trial log written by the experiment
    #[arg(short, long, default_value = "fitts_law_experiment_data.csv")]
    input: PathBuf,

    /// Directory the result tables are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn print_analysis(analysis: &Analysis) {
    let center = analysis.inferred_center;
    println!("Inferred screen center: ({:.1}, {:.1})", center.x, center.y);

    println!("\nDistance bins (mean intended distance, px):");
    for bin in DistanceBin::ALL {
        match analysis.bin_means[bin.index()] {
            Some(mean) => println!("  {:<12} {mean:>9.2}", bin.label()),
            None => println!("  {:<12} {:>9}", bin.label(), "-"),
        }
    }

    let ids: Vec<String> = analysis
        .unique_ids()
        .iter()
        .map(|id| format!("{id:.2}"))
        .collect();
    println!("\nUnique IDs: [{}]", ids.join(", "));

    println!("\nRegression MT = a + b * ID");
    match &analysis.regression {
        Regression::Fitted(r) => {
            println!("  Intercept (a): {:.3} ms", r.intercept);
            println!("  Slope (b):     {:.3} ms/bit", r.slope);
            println!("  R^2:           {:.3}", r.r_squared);
            println!("  Throughput:    {:.3} bits/s", r.throughput);
        }
        Regression::InsufficientData { points } => {
            println!("  insufficient data ({points} rows with an ID)");
        }
        Regression::Degenerate { points } => {
            println!("  insufficient data (all {points} rows share one ID)");
        }
    }

    println!("\nPer participant:");
    println!(
        "  {:<16} {:>10} {:>10} {:>12} {:>7}",
        "participant", "MT_ms", "error", "distance", "trials"
    );
    for p in &analysis.participants {
        println!(
            "  {:<16} {:>10.1} {:>10.3} {:>12.1} {:>7}",
            p.participant, p.mt_ms_mean, p.error_rate, p.distance_mean, p.trials
        );
    }

    println!("\nPer ID:");
    println!("  {:>8} {:>10} {:>8} {:>8}", "ID", "MT", "Error", "IP");
    for row in report::difficulty_table(analysis) {
        println!(
            "  {:>8.3} {:>10.3} {:>8.3} {:>8.3}",
            row.id, row.mt, row.error, row.ip
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let records = read_trial_log(&args.input)?;
    let analysis = analyze(&records)
        .with_context(|| format!("analyzing {}", args.input.display()))?;
    print_analysis(&analysis);

    let mut emitter = CsvReportEmitter::in_dir(&args.output_dir)
        .with_context(|| format!("preparing {}", args.output_dir.display()))?;
    write_reports(&analysis, &mut emitter)?;
    let paths = emitter.paths();
    println!("\nWrote {}", paths.trials.display());
    println!("Wrote {}", paths.participants.display());
    println!("Wrote {}", paths.difficulty.display());

    Ok(())
}
