//! Output formatting for CLI display.

use scanboard::model::{
    Issue, Level, Priority, RemediationStatus, Severity, TimelineItem, TodoItem, TodoStatus,
};

/// Lines up command output under the command text.
const OUTPUT_INDENT: &str = "           ";

/// Format the plan as a checklist, one item per line.
pub(super) fn format_plan(items: &[TodoItem]) -> String {
    if items.is_empty() {
        return "No plan yet".to_string();
    }
    items
        .iter()
        .map(|item| {
            let mark = match item.status {
                TodoStatus::Todo => "[ ]",
                TodoStatus::InProgress => "[~]",
                TodoStatus::Completed => "[x]",
            };
            let flag = if item.priority == Priority::High { " (!)" } else { "" };
            format!("{mark} {}{flag}", item.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the timeline: commands with indented output, commentary with its level.
pub(super) fn format_timeline(items: &[TimelineItem]) -> String {
    if items.is_empty() {
        return "Nothing has happened yet".to_string();
    }
    items
        .iter()
        .map(|item| {
            let time = item.timestamp().strftime("%H:%M:%S");
            match item {
                TimelineItem::Command { payload, .. } => {
                    let output = match &payload.output {
                        Some(output) => output
                            .lines()
                            .map(|line| format!("{OUTPUT_INDENT}{line}"))
                            .collect::<Vec<_>>(),
                        None => vec![format!("{OUTPUT_INDENT}(running)")],
                    };
                    std::iter::once(format!("{time} $ {}", payload.command))
                        .chain(output)
                        .collect::<Vec<_>>()
                        .join("\n")
                }
                TimelineItem::Message { payload, .. } => {
                    let level = match payload.level {
                        Level::Info => "info",
                        Level::Error => "error",
                        Level::Success => "ok",
                    };
                    let text = payload.text().unwrap_or_default();
                    format!("{time} [{level}] {text}")
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One summary line per issue.
pub(super) fn format_issue(issue: &Issue) -> String {
    let severity = match issue.severity {
        Severity::Critical => "critical",
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
        Severity::Info => "info",
    };
    let remediation = issue
        .remediation_status
        .map_or("-", RemediationStatus::as_str);
    format!(
        "{}  [{severity}] {} / {}  {}",
        issue.id,
        issue.verification_status.as_str(),
        remediation,
        issue.title
    )
}
