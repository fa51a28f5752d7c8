//! CLI entrypoint for trajentropy.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trajentropy_core::{ValidationLevel, validation_level};
use trajentropy_harness::render::render_analysis;
use trajentropy_harness::structured_log::{LogEmitter, now_utc};
use trajentropy_harness::{
    AnalysisReport, ChainFile, OutputFormat, VerificationReport, run_chain, run_fixture_dir,
};

/// Trajectory entropy of Markov chains.
#[derive(Debug, Parser)]
#[command(name = "trajentropy")]
#[command(about = "Trajectory entropy of irreducible, aperiodic Markov chains")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze the built-in five-state example chain.
    Demo {
        /// Digits after the decimal point.
        #[arg(long, default_value_t = 3)]
        precision: usize,
        /// Output format (`plain` or `json`).
        #[arg(long, default_value = "plain")]
        format: String,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Analyze a chain file.
    Compute {
        /// Chain JSON file.
        #[arg(long)]
        input: PathBuf,
        /// Digits after the decimal point.
        #[arg(long, default_value_t = 3)]
        precision: usize,
        /// Output format (`plain` or `json`).
        #[arg(long, default_value = "plain")]
        format: String,
        /// Input validation (`strict` or `trusting`); defaults to TRAJENTROPY_VALIDATION.
        #[arg(long)]
        validation: Option<String>,
        /// Write the output here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Verify the pipeline against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long, default_value = "tests/fixtures")]
        fixtures: PathBuf,
        /// Output report path (markdown, or JSON when the extension is `.json`).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Demo {
            precision,
            format,
            log,
        } => {
            let format = OutputFormat::parse(&format)?;
            let mut emitter = LogEmitter::for_path(log.as_deref(), "demo")?;
            let output = analyze(
                &ChainFile::demo(),
                validation_level(),
                precision,
                format,
                &mut emitter,
            );
            emitter.flush()?;
            print!("{}", output?);
        }
        Command::Compute {
            input,
            precision,
            format,
            validation,
            output,
            log,
        } => {
            let format = OutputFormat::parse(&format)?;
            let validation = validation
                .as_deref()
                .map_or_else(validation_level, ValidationLevel::from_str_loose);
            let chain = ChainFile::from_file(&input)?;
            let mut emitter = LogEmitter::for_path(log.as_deref(), "compute")?;
            let rendered = analyze(&chain, validation, precision, format, &mut emitter);
            emitter.flush()?;
            let rendered = rendered?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Command::Verify {
            fixtures,
            report,
            log,
        } => {
            eprintln!("Verifying against fixtures in {}", fixtures.display());
            let mut emitter = LogEmitter::for_path(log.as_deref(), "verify")?;
            let summary = run_fixture_dir(&fixtures, &mut emitter)?;
            emitter.flush()?;

            for r in &summary.results {
                let status = if r.passed { "PASS" } else { "FAIL" };
                eprintln!("[{status}] {} (max deviation {:.3e})", r.case_name, r.max_deviation);
                for note in &r.notes {
                    eprintln!("    {note}");
                }
            }
            eprintln!(
                "{} cases: {} passed, {} failed",
                summary.total, summary.passed, summary.failed
            );

            let all_passed = summary.all_passed();
            if let Some(path) = report {
                let report = VerificationReport {
                    title: "trajentropy fixture verification".to_string(),
                    timestamp: now_utc(),
                    summary,
                };
                let body = if path.extension().and_then(|s| s.to_str()) == Some("json") {
                    report.to_json()
                } else {
                    report.to_markdown()
                };
                std::fs::write(&path, body)?;
                eprintln!("Report written to {}", path.display());
            }
            if !all_passed {
                return Err("fixture verification failed".into());
            }
        }
    }

    Ok(())
}

fn analyze(
    chain: &ChainFile,
    validation: ValidationLevel,
    precision: usize,
    format: OutputFormat,
    emitter: &mut LogEmitter,
) -> Result<String, Box<dyn std::error::Error>> {
    let run = run_chain(chain, validation, emitter)?;
    Ok(match format {
        OutputFormat::Plain => render_analysis(chain, &run.matrix, &run.analysis, precision),
        OutputFormat::Json => {
            let mut json =
                AnalysisReport::new(chain, &run.matrix, &run.analysis, validation).to_json()?;
            json.push('\n');
            json
        }
    })
}
