mod loader;
mod reports;
mod seeds;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use freight_sim::{FreightEngine, SimulationReport};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use loader::FileScenarioLoader;
use seeds::resolve_seed_inputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored, human-readable lines
    Console,
    /// Pretty-printed JSON array of run reports
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "freight-cli", version)]
#[command(about = "Run the freight agency delivery simulation over a scenario")]
struct Args {
    /// Scenario JSON file (defaults to the bundled sample scenario)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seeds to run (comma-separated, decimal or 0x-hex); defaults to the scenario seed
    #[arg(long)]
    seeds: Option<String>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_some() || args.report != ReportFormat::Console {
        colored::control::set_override(false);
    }

    let engine = FreightEngine::new(FileScenarioLoader::new(args.scenario.clone()));
    let seeds = resolve_seed_inputs(args.seeds.as_deref())?;
    let reports = run_simulations(&engine, &seeds)?;
    write_reports(&args, &reports)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_simulations(
    engine: &FreightEngine<FileScenarioLoader>,
    seeds: &[Option<u64>],
) -> Result<Vec<SimulationReport>> {
    let mut reports = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let report = engine.run(*seed).with_context(|| match seed {
            Some(seed) => format!("simulation failed for seed {seed}"),
            None => "simulation failed".to_string(),
        })?;
        log::info!(
            "run {:?}: {} delivered, {} rejected",
            report.seed,
            report.delivered_count(),
            report.rejected_count()
        );
        reports.push(report);
    }
    Ok(reports)
}

fn write_reports(args: &Args, reports: &[SimulationReport]) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, reports)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut output_target, reports)?,
        ReportFormat::Console => {
            writeln!(
                &mut output_target,
                "{}",
                "🚚 Freight Agency Simulator".bright_cyan().bold()
            )?;
            if reports.is_empty() {
                writeln!(&mut output_target, "No simulation runs executed.")?;
            } else {
                reports::generate_console_report(&mut output_target, reports)?;
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("freight-main-{label}-{}", std::process::id()))
    }

    fn base_args() -> Args {
        Args {
            scenario: None,
            seeds: None,
            report: ReportFormat::Json,
            verbose: false,
            output: None,
        }
    }

    fn engine() -> FreightEngine<FileScenarioLoader> {
        FreightEngine::new(FileScenarioLoader::default())
    }

    #[test]
    fn runs_one_report_per_seed() {
        let reports = run_simulations(&engine(), &[Some(1), Some(2), Some(1)]).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0], reports[2]);
        assert_eq!(reports[1].seed, Some(2));
    }

    #[test]
    fn missing_seed_uses_scenario_seed() {
        let reports = run_simulations(&engine(), &[None]).unwrap();
        assert_eq!(reports[0].seed, Some(1337));
    }

    #[test]
    fn bad_scenario_path_surfaces_context() {
        let engine = FreightEngine::new(FileScenarioLoader::new(Some(temp_path("absent"))));
        let err = run_simulations(&engine, &[Some(1)]).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("simulation failed for seed 1"));
        assert!(chain.contains("failed to read"));
    }

    #[test]
    fn write_reports_emits_json_output() {
        let temp = temp_path("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        let reports = run_simulations(&engine(), &[Some(9)]).unwrap();
        write_reports(&args, &reports).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        let parsed: Vec<SimulationReport> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, reports);
    }

    #[test]
    fn write_reports_console_handles_empty_runs() {
        colored::control::set_override(false);
        let temp = temp_path("report.txt");
        let args = Args {
            report: ReportFormat::Console,
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[]).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Freight Agency Simulator"));
        assert!(content.contains("No simulation runs executed."));
    }

    #[test]
    fn write_reports_emits_markdown() {
        let temp = temp_path("report.md");
        let args = Args {
            report: ReportFormat::Markdown,
            output: Some(temp.clone()),
            ..base_args()
        };
        let reports = run_simulations(&engine(), &[Some(3)]).unwrap();
        write_reports(&args, &reports).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("# Freight Simulation Results"));
        assert!(content.contains("## Run (seed 3)"));
    }
}
