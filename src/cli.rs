//! CLI interface for scanboard.
//!
//! A thin shell over the library: load what the agent and the audit layer
//! produced, derive a view, print it. Each subcommand is non-interactive:
//! files in, text or JSON out.

mod format;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;

use scanboard::config::Config;
use scanboard::identity::resolve_identity;
use scanboard::lifecycle::{Review, apply_remediation_transition, apply_verification_transition};
use scanboard::model::{Issue, RemediationStatus, VerificationStatus};
use scanboard::{plan, source, timeline};

use format::{format_issue, format_plan, format_timeline};

/// Scanboard: make sense of what the scanning agent is doing.
#[derive(Debug, Parser)]
#[command(name = "scanboard", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Print JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: following a scan
  1. scanboard plan run.jsonl
  2. scanboard timeline run.jsonl --commands-only
  3. scanboard issue list issues.json
  4. scanboard issue review issues.json i-7 confirmed --notes 'banner matches' --out issues.json";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the agent's current task plan.
    Plan {
        /// Agent log: JSONL or a JSON array of entries.
        log: PathBuf,
    },

    /// Show commands and commentary in time order.
    Timeline {
        /// Agent log: JSONL or a JSON array of entries.
        log: PathBuf,

        /// Hide commentary, show only shell commands.
        #[arg(long)]
        commands_only: bool,
    },

    /// Review and track discovered issues.
    Issue {
        #[command(subcommand)]
        command: IssueCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum IssueCommand {
    /// List issues with their verification and remediation status.
    List {
        /// Issue list: a JSON array.
        issues: PathBuf,
    },

    /// Record a reviewer decision on one issue.
    ///
    /// The updated issue list is written to `--out` (if given) or stdout.
    Review {
        issues: PathBuf,

        /// Issue id.
        id: String,

        verdict: VerdictArg,

        /// Reviewer notes. Replace any earlier notes.
        #[arg(long)]
        notes: Option<String>,

        /// Reviewer identity. Required when confirming.
        #[arg(long = "as")]
        identity: Option<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Move one issue along the remediation axis.
    ///
    /// The updated issue list is written to `--out` (if given) or stdout.
    Remediation {
        issues: PathBuf,

        /// Issue id.
        id: String,

        status: RemediationArg,

        /// Identity to stamp when the fix is applied.
        #[arg(long = "as")]
        identity: Option<String>,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// CLI-facing reviewer decision, mapped to the domain `VerificationStatus`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VerdictArg {
    Confirmed,
    Dismissed,
    NeedsInfo,
}

impl VerdictArg {
    fn to_domain(self) -> VerificationStatus {
        match self {
            Self::Confirmed => VerificationStatus::Confirmed,
            Self::Dismissed => VerificationStatus::Dismissed,
            Self::NeedsInfo => VerificationStatus::NeedsInfo,
        }
    }
}

/// CLI-facing remediation status, mapped to the domain `RemediationStatus`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RemediationArg {
    NotStarted,
    InProgress,
    Applied,
    Failed,
    Verified,
}

impl RemediationArg {
    fn to_domain(self) -> RemediationStatus {
        match self {
            Self::NotStarted => RemediationStatus::NotStarted,
            Self::InProgress => RemediationStatus::InProgress,
            Self::Applied => RemediationStatus::Applied,
            Self::Failed => RemediationStatus::Failed,
            Self::Verified => RemediationStatus::Verified,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Plan { log } => cmd_plan(config, &log, cli.json),
        Command::Timeline { log, commands_only } => {
            cmd_timeline(config, &log, commands_only, cli.json)
        }
        Command::Issue { command } => match command {
            IssueCommand::List { issues } => cmd_issue_list(&issues, cli.json),
            IssueCommand::Review {
                issues,
                id,
                verdict,
                notes,
                identity,
                out,
            } => {
                let reviewer = if matches!(verdict, VerdictArg::Confirmed) {
                    Some(resolve_identity(identity.as_deref(), config)?)
                } else {
                    resolve_identity(identity.as_deref(), config).ok()
                };
                let mut review = Review::new(Timestamp::now());
                review.reviewer = reviewer;
                review.notes = notes;
                update_issue(&issues, &id, out.as_deref(), |issue| {
                    apply_verification_transition(issue, verdict.to_domain(), &review)
                })
            }
            IssueCommand::Remediation {
                issues,
                id,
                status,
                identity,
                out,
            } => {
                let mut review = Review::new(Timestamp::now());
                review.reviewer = if matches!(status, RemediationArg::Applied) {
                    Some(resolve_identity(identity.as_deref(), config)?)
                } else {
                    resolve_identity(identity.as_deref(), config).ok()
                };
                update_issue(&issues, &id, out.as_deref(), |issue| {
                    apply_remediation_transition(issue, status.to_domain(), &review)
                })
            }
        },
    }
}

fn cmd_plan(config: &Config, log: &Path, json: bool) -> Result<(), String> {
    let events = source::load_log(log).map_err(|e| format!("failed to load log: {e}"))?;
    let items = plan::reduce(&events, &config.tools);

    if json {
        print_json(&items)
    } else {
        println!("{}", format_plan(&items));
        Ok(())
    }
}

fn cmd_timeline(
    config: &Config,
    log: &Path,
    commands_only: bool,
    json: bool,
) -> Result<(), String> {
    let events = source::load_log(log).map_err(|e| format!("failed to load log: {e}"))?;
    let full = timeline::derive(&events, &config.tools);
    let items = timeline::filter(&full, !commands_only);

    if json {
        print_json(&items)
    } else {
        println!("{}", format_timeline(&items));
        Ok(())
    }
}

fn cmd_issue_list(issues: &Path, json: bool) -> Result<(), String> {
    let issues = load_issues(issues)?;

    if json {
        return print_json(&issues);
    }
    if issues.is_empty() {
        println!("No issues");
        return Ok(());
    }
    for issue in &issues {
        println!("{}", format_issue(issue));
    }
    Ok(())
}

/// Apply `f` to one issue and emit the whole updated list.
fn update_issue(
    path: &Path,
    id: &str,
    out: Option<&Path>,
    f: impl FnOnce(Issue) -> Issue,
) -> Result<(), String> {
    let mut issues = load_issues(path)?;
    let slot = issues
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| format!("no issue with id '{id}'"))?;
    *slot = f(slot.clone());
    let summary = format_issue(slot);

    match out {
        Some(out) => {
            source::write_issues(out, &issues)
                .map_err(|e| format!("failed to write {}: {e}", out.display()))?;
            eprintln!("{summary} → {}", out.display());
        }
        None => print_json(&issues)?,
    }
    Ok(())
}

fn load_issues(path: &Path) -> Result<Vec<Issue>, String> {
    source::load_issues(path).map_err(|e| format!("failed to load issues: {e}"))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("failed to serialize: {e}"))?;
    println!("{json}");
    Ok(())
}
