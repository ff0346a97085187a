use anyhow::Result;
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use precip_rs::viz::{self, ChartOptions};
use precip_rs::{Session, SeriesStore, functions, stats};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "precip",
    version,
    about = "Import, filter, summarize & chart MeteoSwiss precipitation CSV files"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import CSV files and report what was read.
    Import(ImportArgs),
    /// Print summary statistics for the selected series and range.
    Stats(SelectArgs),
    /// Render the selected series (and an optional function) to SVG or PNG.
    ///
    /// SVG is the labelled format. PNG output has no text: no title, axis
    /// labels or legend names.
    Plot(PlotArgs),
    /// List the functions available for --function.
    Functions,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// CSV/TXT files to import (ISO-8859-1, `;`, `,` or tab separated).
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Print per-series statistics as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// CSV/TXT files to import; a later file replaces an earlier one with the same city.
    files: Vec<PathBuf>,
    /// Start with the built-in demo series (Lausanne, Lugano, Zürich, Davos).
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Start of the date range (e.g. 01.01.1950 or 1950-01-01). Defaults to the earliest point.
    #[arg(long)]
    from: Option<String>,
    /// End of the date range. Defaults to the latest point.
    #[arg(long)]
    to: Option<String>,
    /// Series to show (repeatable). Defaults to all series.
    #[arg(long = "city")]
    cities: Vec<String>,
}

#[derive(Args, Debug)]
struct PlotArgs {
    #[command(flatten)]
    select: SelectArgs,
    /// Output path. `.svg` carries title, axis labels and legend; any other
    /// extension writes a PNG without text.
    #[arg(long)]
    out: PathBuf,
    /// Function to overlay, see `precip functions`.
    #[arg(long)]
    function: Option<String>,
    /// Number of samples for the function curve.
    #[arg(long, default_value_t = functions::DEFAULT_SAMPLES)]
    samples: usize,
    /// Chart title.
    #[arg(long, default_value = "Précipitations")]
    title: String,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 2 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.2}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Import(args) => cmd_import(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Plot(args) => cmd_plot(args),
        Command::Functions => {
            for label in functions::labels() {
                println!("{}", label);
            }
            Ok(())
        }
    }
}

fn cmd_import(args: ImportArgs) -> Result<()> {
    let mut store = SeriesStore::new();
    let mut names = Vec::new();
    let mut failed = 0usize;
    for path in &args.files {
        match store.import_file(path) {
            Ok(name) => {
                eprintln!("{}: {}", path.display(), precip_rs::error::STATUS_LOADED);
                names.push(name);
            }
            Err(err) => {
                eprintln!("{}: {}", path.display(), err.status_message());
                failed += 1;
            }
        }
    }

    let summaries: Vec<_> = names
        .iter()
        .filter_map(|n| store.get(n))
        .map(stats::summarize_one)
        .collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for s in &summaries {
            let ts = |t: Option<chrono::NaiveDateTime>| {
                t.map(|t| t.format("%d.%m.%Y %H:%M").to_string())
                    .unwrap_or_else(|| "NA".to_string())
            };
            println!(
                "{}  points={} missing={}  {} .. {}",
                s.name,
                s.count + s.missing,
                s.missing,
                ts(s.first),
                ts(s.last)
            );
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files could not be imported", failed, args.files.len());
    }
    Ok(())
}

/// Build a session from the shared selection arguments.
fn load_session(args: &SelectArgs) -> Result<Session> {
    let mut session = if args.demo {
        Session::new(Local::now().year())
    } else {
        Session::with_store(SeriesStore::new())
    };
    for path in &args.files {
        session.import_file(path)?;
    }
    if session.store().is_empty() {
        anyhow::bail!("no series loaded: pass CSV files or --demo");
    }

    if !args.cities.is_empty() {
        session.select_only(&args.cities);
    }

    if args.from.is_some() || args.to.is_some() {
        let full = session.params().range;
        let fmt = |t: chrono::NaiveDateTime| t.format("%d.%m.%Y %H:%M").to_string();
        let from = args.from.clone().unwrap_or_else(|| fmt(full.from()));
        let to = args.to.clone().unwrap_or_else(|| fmt(full.to()));
        session.set_range_text(&from, &to)?;
    }
    Ok(session)
}

fn cmd_stats(args: SelectArgs) -> Result<()> {
    let session = load_session(&args)?;
    let params = session.params();
    let filtered = session.store().filter(&params.range, &params.selected);
    for s in stats::summarize(&filtered) {
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={} total={}",
            s.name,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            fmt_opt(s.total)
        );
    }
    Ok(())
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let mut session = load_session(&args.select)?;
    if let Some(label) = args.function.as_deref() {
        if functions::from_label(label).is_none() {
            eprintln!("unknown function {:?}, see `precip functions`", label);
        }
        session.set_function(Some(label));
    }
    session.set_samples(args.samples);

    let curves = session.curves();
    let opts = ChartOptions {
        title: args.title,
        width: args.width,
        height: args.height,
    };
    viz::plot_curves(&curves, &args.out, &opts)?;
    eprintln!("Wrote plot to {}", args.out.display());
    Ok(())
}
