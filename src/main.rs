use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ci_release::cli::orchestration::{self, NextVersionArgs, ProjectContext};
use ci_release::coverage::CoverageFormat;
use ci_release::language::{Language, LANGUAGE_ENV};
use ci_release::pipeline::Dialect;
use ci_release::{logging, ui};

#[derive(clap::Parser)]
#[command(
    name = "ci-release",
    version,
    about = "Release helpers for CI pipelines: next version, coverage gates and pipeline variables"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Project directory (git checkout root)"
    )]
    project_dir: PathBuf,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the next patch release from remote tags and publish it
    NextVersion {
        #[arg(long, env = LANGUAGE_ENV, value_parser = parse_language, help = "Project language")]
        language: Language,

        #[arg(long, value_enum, help = "Pipeline variable syntax")]
        dialect: Option<Dialect>,

        #[arg(long, help = "Only print the version; leave project files untouched")]
        no_write: bool,
    },

    /// Fail when test coverage is below the required minimum
    CheckCoverage {
        #[arg(long, value_enum, help = "Report flavour")]
        format: CoverageFormat,

        #[arg(long, help = "Coverage XML report path")]
        report: Option<PathBuf>,

        #[arg(long, help = "Minimum line coverage ratio (0.0 - 1.0)")]
        minimum: Option<f64>,
    },

    /// Emit REPO_NAME from the origin remote
    RepoName {
        #[arg(long, value_enum, help = "Pipeline variable syntax")]
        dialect: Option<Dialect>,
    },

    /// Emit SERVICE_NAME from [metadata] name
    ServiceName {
        #[arg(long, value_enum, help = "Pipeline variable syntax")]
        dialect: Option<Dialect>,
    },

    /// Generate HTML documentation for the configured proto files
    ProtoDocs {
        #[arg(long, help = "Output directory for proto.html")]
        out: Option<String>,
    },
}

fn parse_language(value: &str) -> std::result::Result<Language, String> {
    value.parse::<Language>().map_err(|e| e.to_string())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version come through here too and are not failures
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    logging::init(args.verbose);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            1
        }
    };
    std::process::exit(code);
}

/// Run the selected subcommand, returning the process exit code
fn run(args: Args) -> Result<i32> {
    let ctx = ProjectContext::load(&args.project_dir, args.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::NextVersion {
            language,
            dialect,
            no_write,
        } => {
            let source = language.tag_source(&ctx.project_dir);
            let workflow = NextVersionArgs {
                language,
                dialect,
                write: !no_write,
            };

            let result = orchestration::run_next_version(&ctx, &workflow, &source, &mut stdout)?;
            for path in &result.updated_files {
                ui::display_status(&format!("Updated {}", path.display()));
            }
            ui::display_success(&format!("Release version: {}", result.release));
        }
        Command::CheckCoverage {
            format,
            report,
            minimum,
        } => {
            let report =
                orchestration::run_check_coverage(&ctx, format, report.as_deref(), minimum)?;
            ui::display_coverage(&report);
        }
        Command::RepoName { dialect } => {
            let name = orchestration::run_repo_name(&ctx, dialect, &mut stdout)?;
            ui::display_success(&format!("Repository: {}", name));
        }
        Command::ServiceName { dialect } => {
            let name = orchestration::run_service_name(&ctx, dialect, &mut stdout)?;
            ui::display_success(&format!("Service: {}", name));
        }
        Command::ProtoDocs { out } => {
            let status = orchestration::run_proto_docs(&ctx, out.as_deref())?;
            return Ok(status.code().unwrap_or(1));
        }
    }

    Ok(0)
}
