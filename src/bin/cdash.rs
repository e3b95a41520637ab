use anyhow::{Result, bail};
use cdash_rs::aggregate::DEFAULT_TOP_N;
use cdash_rs::api::{Client, DEFAULT_LAYER_URL, FeatureSource, FileSource};
use cdash_rs::viz::util::{format_count, map_locale};
use cdash_rs::viz::{DashboardOptions, Projection};
use cdash_rs::{Metric, Snapshot, storage};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "cdash",
    version,
    about = "Fetch a COVID-19 case snapshot and render a static HTML dashboard"
)]
struct Cli {
    /// Where to write the dashboard page.
    #[arg(long, default_value = "first_figure.html")]
    out: PathBuf,
    /// Do not open the page after writing it.
    #[arg(long, default_value_t = false)]
    no_open: bool,
    /// Read a saved query response (JSON) instead of calling the service.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Feature layer URL (the `/query` suffix is appended).
    #[arg(long, default_value = DEFAULT_LAYER_URL)]
    url: String,
    /// Total HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    /// Number of countries per bar chart.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,
    /// Number formatting locale for the indicators (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Map projection.
    #[arg(long, value_enum, default_value_t = ProjectionArg::Equirectangular)]
    projection: ProjectionArg,
    /// Save the cleaned records (format inferred by --format or extension).
    #[arg(long)]
    save_records: Option<PathBuf>,
    /// Save the per-country totals (format inferred by --format or extension).
    #[arg(long)]
    save_totals: Option<PathBuf>,
    /// Export format (csv or json). If omitted, inferred from the file extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print global totals and rankings to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ProjectionArg {
    Equirectangular,
    Orthographic,
}

impl From<ProjectionArg> for Projection {
    fn from(p: ProjectionArg) -> Self {
        match p {
            ProjectionArg::Equirectangular => Projection::Equirectangular,
            ProjectionArg::Orthographic => Projection::Orthographic {
                lon0: 0.0,
                lat0: 0.0,
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let source: Box<dyn FeatureSource> = match &cli.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(Client::with_timeout(
            cli.url.as_str(),
            Duration::from_secs(cli.timeout),
        )?),
    };

    let snapshot = Snapshot::load(source.as_ref(), cli.top)?;
    eprintln!(
        "Loaded {} records across {} countries",
        snapshot.records.len(),
        snapshot.summary.countries.len()
    );

    if let Some(path) = cli.save_records.as_ref() {
        match export_format(cli.format, path)? {
            OutFormat::Csv => storage::save_records_csv(&snapshot.records, path)?,
            OutFormat::Json => storage::save_records_json(&snapshot.records, path)?,
        }
        eprintln!("Saved {} records to {}", snapshot.records.len(), path.display());
    }
    if let Some(path) = cli.save_totals.as_ref() {
        match export_format(cli.format, path)? {
            OutFormat::Csv => storage::save_totals_csv(&snapshot.summary.countries, path)?,
            OutFormat::Json => storage::save_totals_json(&snapshot.summary.countries, path)?,
        }
        eprintln!(
            "Saved {} country totals to {}",
            snapshot.summary.countries.len(),
            path.display()
        );
    }

    let opts = DashboardOptions {
        locale: cli.locale.clone(),
        projection: cli.projection.into(),
        ..DashboardOptions::default()
    };
    snapshot.write_dashboard(&opts, &cli.out)?;
    eprintln!("Wrote dashboard to {}", cli.out.display());

    if cli.stats {
        print_stats(&snapshot, &cli.locale);
    }

    if !cli.no_open {
        open_in_viewer(&cli.out);
    }
    Ok(())
}

fn export_format(explicit: Option<OutFormat>, path: &Path) -> Result<OutFormat> {
    if let Some(f) = explicit {
        return Ok(f);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Ok(OutFormat::Csv),
        "json" => Ok(OutFormat::Json),
        other => bail!("unsupported format: {}", other),
    }
}

fn print_stats(snapshot: &Snapshot, locale_tag: &str) {
    let locale = map_locale(locale_tag);
    let global = &snapshot.summary.global;
    for metric in Metric::ALL {
        println!("{:<16} {}", metric.label(), format_count(global.metric(metric), locale));
    }
    for ranking in snapshot.summary.rankings() {
        println!();
        println!("Top {} • {}", ranking.len(), ranking.metric.label());
        for (i, (country, value)) in ranking.entries.iter().enumerate() {
            println!("{:>3}. {:<32} {}", i + 1, country, format_count(*value, locale));
        }
    }
}

/// Best-effort: hand the page to the platform's default viewer.
fn open_in_viewer(path: &Path) {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    match cmd.arg(path).spawn() {
        Ok(_) => log::debug!("opened {}", path.display()),
        Err(e) => log::warn!("could not open {}: {}", path.display(), e),
    }
}
