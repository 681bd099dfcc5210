//! Execution timeline: shell commands interleaved with agent commentary.

use crate::classify::{Event, classify_all};
use crate::config::ToolNames;
use crate::correlate;
use crate::model::{BashCommand, LogEntry, TimelineItem};

/// Derive the full timeline from the complete entry list.
///
/// Re-derived from scratch on every call, so the same entries always give
/// the same timeline.
pub fn derive(events: &[LogEntry], tools: &ToolNames) -> Vec<TimelineItem> {
    let commands = correlate::reduce(events, tools).into_commands();
    merge(commands, commentary(events, tools))
}

/// Entries shown as commentary.
///
/// Plain messages, plus invocations of tools other than the plan and shell
/// tools when they carry a message. Updates never show up as commentary.
fn commentary(events: &[LogEntry], tools: &ToolNames) -> Vec<LogEntry> {
    classify_all(events)
        .filter_map(|event| match event {
            Event::Message(entry) => Some(entry),
            Event::Invocation { entry, payload }
                if payload.tool_name != tools.plan && payload.tool_name != tools.shell =>
            {
                entry.text().map(|_| entry)
            }
            _ => None,
        })
        .cloned()
        .collect()
}

/// Merge commands and commentary into one list, oldest first.
///
/// Commands go first, then messages, then a stable sort by timestamp:
/// equal timestamps keep that order.
pub fn merge(commands: Vec<BashCommand>, messages: Vec<LogEntry>) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = commands
        .into_iter()
        .map(TimelineItem::command)
        .chain(messages.into_iter().map(TimelineItem::message))
        .collect();
    items.sort_by_key(TimelineItem::timestamp);
    items
}

/// Project the timeline for display.
///
/// With `show_context` the whole timeline comes back; without it, only the
/// commands. The input is left untouched.
pub fn filter(timeline: &[TimelineItem], show_context: bool) -> Vec<TimelineItem> {
    timeline
        .iter()
        .filter(|item| show_context || item.is_command())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use serde_json::{Value, json};

    use crate::model::{Level, ToolPayload};

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(secs).unwrap()
    }

    fn bash(id: &str, secs: i64, command: &str) -> LogEntry {
        LogEntry::invocation(
            at(secs),
            ToolPayload::new(id, "Bash").with_input(json!({ "command": command })),
        )
    }

    fn derive_default(events: &[LogEntry]) -> Vec<TimelineItem> {
        derive(events, &ToolNames::default())
    }

    #[test]
    fn orders_chronologically_not_by_arrival() {
        let events = vec![
            bash("c2", 2, "second"),
            bash("c1", 1, "first"),
            LogEntry::message(at(3), Level::Info, "third"),
        ];

        let timeline = derive_default(&events);
        let times: Vec<_> = timeline.iter().map(TimelineItem::timestamp).collect();
        assert_eq!(times, [at(1), at(2), at(3)]);
        assert!(timeline[0].is_command());
        assert!(timeline[1].is_command());
        assert!(!timeline[2].is_command());
    }

    #[test]
    fn output_is_merged_into_the_command_item() {
        let events = vec![
            bash("c1", 10, "nmap -sV 10.0.0.5"),
            LogEntry::update(at(12), ToolPayload::new("c1", "Bash").with_output("22/tcp open")),
        ];

        let timeline = derive_default(&events);
        assert_eq!(timeline.len(), 1);
        match &timeline[0] {
            TimelineItem::Command { timestamp, payload } => {
                assert_eq!(*timestamp, at(10));
                assert_eq!(payload.output.as_deref(), Some("22/tcp open"));
            }
            TimelineItem::Message { .. } => panic!("expected a command"),
        }
    }

    #[test]
    fn pending_commands_are_still_shown() {
        let timeline = derive_default(&[bash("c1", 1, "sleep 100")]);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn ties_put_commands_before_messages() {
        let events = vec![
            LogEntry::message(at(5), Level::Info, "about to run"),
            bash("c1", 5, "id"),
        ];

        let timeline = derive_default(&events);
        assert!(timeline[0].is_command());
        assert!(!timeline[1].is_command());
    }

    #[test]
    fn ties_keep_arrival_order_within_a_kind() {
        let events = vec![
            LogEntry::message(at(5), Level::Info, "first"),
            LogEntry::message(at(5), Level::Info, "second"),
        ];

        let texts: Vec<_> = derive_default(&events)
            .into_iter()
            .filter_map(|item| match item {
                TimelineItem::Message { payload, .. } => payload.message,
                TimelineItem::Command { .. } => None,
            })
            .collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn plan_writes_and_updates_are_not_commentary() {
        let mut plan = LogEntry::invocation(
            at(1),
            ToolPayload::new("p", "TodoWrite").with_input(json!({"todos": []})),
        );
        plan.message = Some("updating plan".into());
        let mut update = LogEntry::update(at(2), ToolPayload::new("zz", "Bash"));
        update.message = Some("stray output".into());

        assert!(derive_default(&[plan, update]).is_empty());
    }

    #[test]
    fn unrecognized_tools_pass_through_as_commentary() {
        let mut read = LogEntry::invocation(
            at(1),
            ToolPayload::new("r", "Read").with_input(json!({"path": "/etc/hosts"})),
        );
        read.message = Some("reading hosts".into());
        let silent = LogEntry::invocation(at(2), ToolPayload::new("s", "Read"));

        let timeline = derive_default(&[read, silent]);
        assert_eq!(timeline.len(), 1);
        assert!(!timeline[0].is_command());
    }

    #[test]
    fn filter_without_context_keeps_only_commands() {
        let events = vec![
            LogEntry::message(at(1), Level::Info, "hello"),
            bash("c1", 2, "id"),
            LogEntry::message(at(3), Level::Success, "bye"),
        ];
        let timeline = derive_default(&events);

        let filtered = filter(&timeline, false);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.iter().all(TimelineItem::is_command));
        assert!(filtered.len() <= timeline.len());

        assert_eq!(filter(&timeline, true), timeline);
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn derive_is_idempotent() {
        let events = vec![
            bash("c2", 2, "b"),
            LogEntry::message(at(2), Level::Info, "x"),
            bash("c1", 1, "a"),
            LogEntry::update(at(3), ToolPayload::new("c1", "Bash").with_output("ok")),
        ];

        let first = derive_default(&events);
        let second = derive_default(&events);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let timeline = derive_default(&[bash("c1", 1, "id")]);
        let json: Value = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json[0]["kind"], "command");
        assert_eq!(json[0]["payload"]["command"], "id");
    }
}
