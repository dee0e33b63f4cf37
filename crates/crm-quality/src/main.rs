//! CLI entry point for the CRM data-quality engine.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crm_quality::config::DEFAULT_RECORD_LIMIT;
use crm_quality::{
    CsvDirectorySource, DEFAULT_CAMPAIGN_MATCHES, IssueSet, JsonDirectorySource, QualityScan,
    QualityScorer, RecordSource, RecordWindow, ReportWriter, ScanConfig, find_campaigns,
    render_campaigns, render_scan_report,
};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Object type holding campaign records.
const CAMPAIGN_OBJECT: &str = "Campaign";

/// Export file format of the source directory.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceFormat {
    /// One `<ObjectType>.csv` file per object type
    Csv,
    /// One `<ObjectType>.json` query response per object type
    Json,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "CRM data quality scanner",
    long_about = "Scans CRM exports for missing critical fields and numeric outliers,\n\
                  scores overall data quality and reports campaign performance.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CRM_QUALITY_SOURCE              Export directory (default ./exports)\n  \
                  CRM_QUALITY_CONFIG              Scan configuration file (JSON)\n  \
                  CRM_QUALITY_MISSING_THRESHOLD   Missing-data threshold in percent\n  \
                  CRM_QUALITY_Z_SCORE             Anomaly z-score threshold\n\n\
                  EXAMPLES:\n  \
                  # Scan CSV exports with default thresholds\n  \
                  crm-quality scan --source exports/\n\n  \
                  # Scan JSON exports, machine-readable output\n  \
                  crm-quality scan --source exports/ --format json --json\n\n  \
                  # Campaign ROI and conversion\n  \
                  crm-quality campaign \"Spring Launch\" --source exports/\n\n  \
                  # Re-score a saved issue set\n  \
                  crm-quality score outputs/scan_report.json"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the result)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable text
    ///
    /// Disables all logs; only the result is written to stdout.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan object types for data quality issues and score them
    Scan(ScanArgs),
    /// Show ROI and conversion figures for campaigns matching a name
    Campaign(CampaignArgs),
    /// Score a saved issue set or scan report
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Directory holding the CRM exports
    #[arg(short, long, env = "CRM_QUALITY_SOURCE", default_value = "./exports")]
    source: PathBuf,

    /// Export file format
    #[arg(long, value_enum, default_value = "csv")]
    format: SourceFormat,
}

#[derive(Args, Debug)]
struct ScanArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Scan configuration file (JSON); flags below override its values
    #[arg(short, long, env = "CRM_QUALITY_CONFIG")]
    config: Option<PathBuf>,

    /// Only scan these object types (comma-separated)
    #[arg(long, value_delimiter = ',')]
    objects: Vec<String>,

    /// Only scan records created within this many days
    #[arg(long, conflicts_with = "all_time")]
    lookback_days: Option<u32>,

    /// Scan records regardless of creation date
    #[arg(long)]
    all_time: bool,

    /// Maximum records per object type
    #[arg(long)]
    limit: Option<usize>,

    /// Missing-data threshold (0 - 100)
    ///
    /// Fields missing in more than this percentage of records are reported
    #[arg(long, env = "CRM_QUALITY_MISSING_THRESHOLD")]
    missing_threshold: Option<f64>,

    /// Absolute z-score above which numeric values count as anomalies
    #[arg(long, env = "CRM_QUALITY_Z_SCORE")]
    z_score: Option<f64>,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <report-name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Base name of the emitted report
    #[arg(long, default_value = "scan")]
    report_name: String,
}

#[derive(Args, Debug)]
struct CampaignArgs {
    /// Campaign name (case-insensitive substring)
    name: String,

    #[command(flatten)]
    source: SourceArgs,

    /// Maximum number of campaigns to show
    #[arg(long, default_value_t = DEFAULT_CAMPAIGN_MATCHES)]
    max: usize,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// JSON file with an issue set, or a scan report containing one
    issues: PathBuf,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // `.env` first so its values reach the `env = ...` arguments
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.global.log_level, cli.global.quiet, cli.global.json);

    let result = match &cli.command {
        Command::Scan(args) => run_scan(args, &cli.global),
        Command::Campaign(args) => run_campaign(args, &cli.global),
        Command::Score(args) => run_score(args, &cli.global),
    };

    if let Err(ref e) = result {
        error!("{:#}", e);
    }
    result
}

fn run_scan(args: &ScanArgs, global: &GlobalArgs) -> Result<()> {
    let config = build_scan_config(args)?;
    debug!("Scan configuration: {:?}", config);

    let scan = QualityScan::new(config)?;
    match args.source.format {
        SourceFormat::Csv => {
            let source = CsvDirectorySource::new(&args.source.source);
            scan_with(&scan, &source, args, global)
        }
        SourceFormat::Json => {
            let source = JsonDirectorySource::new(&args.source.source);
            scan_with(&scan, &source, args, global)
        }
    }
}

fn build_scan_config(args: &ScanArgs) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading scan configuration from: {}", path.display());
            ScanConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration '{}'", path.display()))?
        }
        None => ScanConfig::default(),
    };

    let mut thresholds = config.thresholds.to_builder();
    if let Some(percent) = args.missing_threshold {
        thresholds = thresholds.missing_data_threshold(percent);
    }
    if let Some(z) = args.z_score {
        thresholds = thresholds.anomaly_z_score(z);
    }
    config.thresholds = thresholds.build()?;

    if args.all_time {
        config.window.lookback_days = None;
    } else if let Some(days) = args.lookback_days {
        config.window.lookback_days = Some(days);
    }
    if let Some(limit) = args.limit {
        config.window.limit = limit;
    }

    Ok(config)
}

fn scan_with<S: RecordSource>(
    scan: &QualityScan,
    source: &S,
    args: &ScanArgs,
    global: &GlobalArgs,
) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting data quality scan of {}", args.source.source.display());
    info!("{}", "=".repeat(80));

    let report = if args.objects.is_empty() {
        scan.run(source)?
    } else {
        scan.run_only(source, args.objects.as_slice())?
    };

    if global.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let path = ReportWriter::new(&args.output)
            .write_report_to_file(&report, &args.report_name)?;
        info!("Report written to: {}", path.display());
    }

    println!();
    println!("{}", render_scan_report(&report));
    if !args.emit_report {
        println!("Use --json for machine-readable output");
        println!("Use --emit-report to save a JSON report");
    }

    Ok(())
}

fn run_campaign(args: &CampaignArgs, global: &GlobalArgs) -> Result<()> {
    let window = RecordWindow {
        lookback_days: None,
        limit: DEFAULT_RECORD_LIMIT,
    };
    let batch = match args.source.format {
        SourceFormat::Csv => {
            CsvDirectorySource::new(&args.source.source).fetch(CAMPAIGN_OBJECT, &window)?
        }
        SourceFormat::Json => {
            JsonDirectorySource::new(&args.source.source).fetch(CAMPAIGN_OBJECT, &window)?
        }
    };
    info!("Loaded {} campaign records", batch.len());

    let campaigns = find_campaigns(&batch, &args.name, args.max)?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&campaigns)?);
    } else {
        println!("{}", render_campaigns(&args.name, &campaigns));
    }
    Ok(())
}

fn run_score(args: &ScoreArgs, global: &GlobalArgs) -> Result<()> {
    let issues = load_issue_set(&args.issues)?;
    let score = QualityScorer::score(&issues);

    if global.json {
        let output = serde_json::json!({
            "quality_score": score,
            "band": score.band(),
            "issue_count": issues.issue_count(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Overall Data Quality Score: {} ({}) from {} issue(s)",
            score,
            score.band(),
            issues.issue_count()
        );
    }
    Ok(())
}

/// Read an issue set, accepting either a bare set or a full scan report.
fn load_issue_set(path: &Path) -> Result<IssueSet> {
    if !path.exists() {
        return Err(anyhow!("Issue file not found: {}", path.display()));
    }

    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;

    Ok(IssueSet::from_document_lenient(&value))
}
