// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashSet;

use clap::ValueEnum;
use folio_core::{JobStatusKind, LogLevel, StatusSnapshot};
use folio_engine::{Decision, SessionUpdate};
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const BAR_WIDTH: usize = 20;

/// Fixed-width progress bar, e.g. `[#########-----------]`.
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One-line summary of a snapshot.
pub fn format_summary(snapshot: &StatusSnapshot) -> String {
    let mut line = format!(
        "{:<10} {} {:>3}%",
        color::status(snapshot.status),
        progress_bar(snapshot.progress_percent),
        snapshot.progress_percent
    );
    if let Some(phase) = &snapshot.current_phase {
        line.push_str(&format!("  {}", color::context(phase)));
    }
    let tally = snapshot.chapter_tally();
    if tally.total() > 0 {
        line.push_str(&format!("  chapters {}/{}", tally.completed, tally.total()));
        if tally.error > 0 {
            line.push_str(&format!(" ({} failed)", tally.error));
        }
    }
    if let Some(words) = snapshot.word_count {
        line.push_str(&format!("  {words} words"));
    }
    line
}

pub fn format_decision(decision: &Decision) -> String {
    match decision {
        Decision::NoActiveJob => "no active job".to_string(),
        Decision::ResumeJob(job) => {
            format!("job {} is still in flight", color::header(&job.to_string()))
        }
        Decision::StaleJobDiscarded { job: Some(job), reason } => {
            format!("discarded job {}: {reason}", color::header(&job.to_string()))
        }
        Decision::StaleJobDiscarded { job: None, reason } => {
            format!("discarded job record: {reason}")
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
enum DecisionJson<'a> {
    NoActiveJob,
    ResumeJob { job: &'a folio_core::JobHandle },
    StaleJobDiscarded { job: Option<&'a folio_core::JobHandle>, reason: String },
}

pub fn decision_json(decision: &Decision) -> serde_json::Result<serde_json::Value> {
    let value = match decision {
        Decision::NoActiveJob => DecisionJson::NoActiveJob,
        Decision::ResumeJob(job) => DecisionJson::ResumeJob { job },
        Decision::StaleJobDiscarded { job, reason } => {
            DecisionJson::StaleJobDiscarded { job: job.as_ref(), reason: reason.to_string() }
        }
    };
    serde_json::to_value(value)
}

pub fn print_decision(decision: &Decision, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", format_decision(decision)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&decision_json(decision)?)?),
    }
    Ok(())
}

pub fn print_snapshot(snapshot: &StatusSnapshot, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for line in UpdatePrinter::new(format).snapshot_lines(snapshot) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(snapshot)?),
    }
    Ok(())
}

/// Renders a stream of session updates, printing each log line and phase
/// error once even though every snapshot repeats them.
pub struct UpdatePrinter {
    format: OutputFormat,
    seen_logs: HashSet<(String, String)>,
    seen_errors: HashSet<(String, String)>,
    last_summary: Option<String>,
}

impl UpdatePrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            seen_logs: HashSet::new(),
            seen_errors: HashSet::new(),
            last_summary: None,
        }
    }

    pub fn render(&mut self, update: &SessionUpdate) -> anyhow::Result<Vec<String>> {
        if self.format == OutputFormat::Json {
            return Ok(vec![serde_json::to_string(update)?]);
        }
        let lines = match update {
            SessionUpdate::Snapshot { snapshot } => self.snapshot_lines(snapshot),
            SessionUpdate::ConnectionState { state } => {
                vec![color::muted(&format!("connection {state}"))]
            }
            SessionUpdate::TransportWarning { message } => vec![format!("warning: {message}")],
            SessionUpdate::Terminal { snapshot } => {
                let mut lines = self.snapshot_lines(snapshot);
                lines.push(final_line(snapshot));
                lines
            }
        };
        Ok(lines)
    }

    fn snapshot_lines(&mut self, snapshot: &StatusSnapshot) -> Vec<String> {
        let mut lines = Vec::new();
        for entry in &snapshot.logs {
            if self.seen_logs.insert((entry.timestamp.clone(), entry.message.clone())) {
                let level = match entry.level {
                    LogLevel::Info | LogLevel::Other => String::new(),
                    level => format!("{level}: "),
                };
                lines.push(format!("{} {level}{}", color::muted(&entry.timestamp), entry.message));
            }
        }
        for error in &snapshot.errors {
            if self.seen_errors.insert((error.phase.clone(), error.message.clone())) {
                lines.push(format!("error in {}: {}", color::context(&error.phase), error.message));
            }
        }
        let summary = format_summary(snapshot);
        if self.last_summary.as_ref() != Some(&summary) {
            lines.push(summary.clone());
            self.last_summary = Some(summary);
        }
        lines
    }
}

fn final_line(snapshot: &StatusSnapshot) -> String {
    match (snapshot.status, snapshot.errors.last()) {
        (JobStatusKind::Failed, Some(error)) => {
            format!("job {} in {}: {}", color::status(snapshot.status), error.phase, error.message)
        }
        (status, _) => format!("job {}", color::status(status)),
    }
}
