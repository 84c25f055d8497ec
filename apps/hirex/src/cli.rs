use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::backend::UploadFile;
use crate::coordinator::{ConfirmGate, DeleteOutcome, LoadStatus};
use crate::errors::{AppError, Notice, NoticeLevel};
use crate::jobs;
use crate::models::candidate::CandidateViewModel;
use crate::models::job::FetchContext;
use crate::state::AppState;

const VISIBLE_SKILLS: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "hirex", version)]
#[command(about = "Screen candidates from the resume extraction and ranking backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List candidates, ranked for the active job when one is set
    List {
        /// Rank against this backend job id instead of the active job
        #[arg(long, conflicts_with = "all")]
        job: Option<i64>,
        /// Ignore the active job and list every candidate unranked
        #[arg(long)]
        all: bool,
        /// Filter by name, title, company, location or skill
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Upload one or more resumes
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Create a job description and make it the active job
    CreateJob {
        #[arg(short, long)]
        description: String,
        /// Defaults to the first line of the description
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Show recently created job descriptions
    Jobs {
        /// Deactivate the active job so listings go back to unranked
        #[arg(long)]
        clear: bool,
    },
    /// Delete a single candidate
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every candidate
    DeleteAll {
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_command(cli: Cli, state: &mut AppState) -> Result<ExitCode> {
    let result = dispatch(cli.command, state).await;

    let notices = state.coordinator.take_notices();
    let reported = notices.iter().any(|n| n.level == NoticeLevel::Error);
    for notice in &notices {
        eprintln!("{}", format_notice(notice));
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // already shown as a notice
        Err(AppError::Backend(_) | AppError::UploadRejected { .. }) if reported => {
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

async fn dispatch(command: Command, state: &mut AppState) -> Result<(), AppError> {
    match command {
        Command::List {
            job,
            all,
            query,
            json,
        } => {
            let context = match (job, all) {
                (_, true) => FetchContext::all_candidates(),
                (Some(job_id), false) => FetchContext::ranked_for(job_id),
                (None, false) => state.jobs.fetch_context(),
            };
            state.coordinator.fetch(context).await?;

            let candidates = state.coordinator.search(query.as_deref().unwrap_or(""));
            if json {
                let out = serde_json::to_string_pretty(&candidates)
                    .context("Failed to serialize candidates")?;
                println!("{out}");
                return Ok(());
            }

            let shown = state.coordinator.view();
            if let (Some(job_id), Some(active)) = (shown.job_id, state.jobs.active()) {
                if active.job_id == job_id {
                    println!("Ranked for: {}\n", active.title);
                }
            }
            if candidates.is_empty() {
                let empty = match &query {
                    Some(q) if !q.trim().is_empty() => format!("No candidates match \"{q}\""),
                    _ => "No candidates yet. Upload resumes to get started.".to_string(),
                };
                eprintln!("{}", format_notice(&Notice::warning(empty)));
            }
            for candidate in &candidates {
                println!("{}\n", render_candidate(candidate));
            }
        }

        Command::Upload { files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(read_upload(path).await?);
            }
            let report = state.coordinator.upload(uploads).await?;
            for outcome in report.outcomes.iter().filter(|o| o.is_success()) {
                match outcome.candidate_id {
                    Some(id) => println!("Uploaded {} (candidate #{id})", outcome.filename),
                    None => println!("Uploaded {}", outcome.filename),
                }
            }
            // a failed re-fetch was already reported as a notice
            if report.refetched && state.coordinator.status() == LoadStatus::Ready {
                println!("{} candidate(s) now on file", state.coordinator.snapshot().len());
            }
        }

        Command::CreateJob { description, title } => {
            let job = jobs::create_job(
                state.backend.as_ref(),
                &mut state.jobs,
                title.as_deref(),
                &description,
            )
            .await?;
            println!("Created job #{}: {} (now active)", job.job_id, job.title);
        }

        Command::Jobs { clear } => {
            if clear {
                state.jobs.clear_active()?;
                println!("Active job cleared");
            }
            let active_id = state.jobs.active().map(|j| j.id);
            if state.jobs.recent().is_empty() {
                println!("No job descriptions yet");
            }
            for job in state.jobs.recent() {
                let marker = if Some(job.id) == active_id { "*" } else { " " };
                println!(
                    "{marker} #{:<5} {}  {}",
                    job.job_id,
                    job.created_at.format("%Y-%m-%d %H:%M"),
                    job.title
                );
            }
            debug!("Job state at {}", state.config.state_path.display());
        }

        Command::Delete { id, yes } => {
            // load the current view so reconciliation knows whether it is ranked
            state.coordinator.fetch(state.jobs.fetch_context()).await?;
            match state.coordinator.delete_one(id, gate(yes)).await? {
                DeleteOutcome::Declined => println!("Cancelled"),
                DeleteOutcome::Applied | DeleteOutcome::Refetched => {
                    if state.coordinator.status() == LoadStatus::Ready {
                        println!(
                            "{} candidate(s) remaining",
                            state.coordinator.snapshot().len()
                        );
                    }
                }
            }
        }

        Command::DeleteAll { yes } => {
            if state.coordinator.delete_all(gate(yes)).await? == DeleteOutcome::Declined {
                println!("Cancelled");
            }
        }
    }
    Ok(())
}

async fn read_upload(path: &Path) -> Result<UploadFile, AppError> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(filename, content))
}

fn assume_yes(_prompt: &str) -> bool {
    true
}

fn ask_on_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(_) => false,
    }
}

fn gate(yes: bool) -> &'static dyn ConfirmGate {
    if yes {
        &assume_yes
    } else {
        &ask_on_stdin
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn format_notice(notice: &Notice) -> String {
    let prefix = match notice.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "✗",
    };
    format!("{prefix} {}", notice.message)
}

/// First five skills, then a `+N more` marker.
fn skill_summary(skills: &[String]) -> String {
    let shown = skills
        .iter()
        .take(VISIBLE_SKILLS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    match skills.len().saturating_sub(VISIBLE_SKILLS) {
        0 => shown,
        hidden => format!("{shown} +{hidden} more"),
    }
}

fn render_candidate(candidate: &CandidateViewModel) -> String {
    let mut header = format!("[{}] {} (#{})", candidate.avatar, candidate.name, candidate.id);
    if let Some(score) = candidate.match_score {
        header.push_str(&format!("  {score:.1}% match"));
    }
    header.push_str(&format!("  · {}", candidate.availability.badge().label));

    let role = [&candidate.title, &candidate.company, &candidate.location]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" · ");

    let mut lines = vec![header];
    if !role.is_empty() {
        lines.push(format!("    {role}"));
    }
    lines.push(format!("    {} | {}", candidate.email, candidate.phone));
    lines.push(format!("    Skills: {}", skill_summary(&candidate.skills)));
    lines.push(format!("    {}", candidate.analysis));
    lines.join("\n")
}
