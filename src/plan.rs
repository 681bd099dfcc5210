//! Todo plan derivation: the agent's live task list.
//!
//! The agent rewrites its whole plan with every plan-tool call, so the plan
//! is the todos of the most recent such call. Earlier snapshots are replaced,
//! never merged.

use std::collections::HashMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::classify::{Event, classify_all};
use crate::config::ToolNames;
use crate::model::{LogEntry, Priority, TodoItem, TodoStatus, ToolPayload};

/// Field holding the todo list in the plan tool's input.
const TODOS_FIELD: &str = "todos";

/// The plan as of the last plan-tool invocation in `events`.
///
/// Returns an empty plan when there is none, or when the last one carried
/// no usable list.
pub fn reduce(events: &[LogEntry], tools: &ToolNames) -> Vec<TodoItem> {
    classify_all(events)
        .filter_map(|event| match event {
            Event::Invocation { payload, .. } if payload.tool_name == tools.plan => Some(payload),
            _ => None,
        })
        .last()
        .map(snapshot)
        .unwrap_or_default()
}

/// Build one snapshot from a plan-tool payload, in list order.
fn snapshot(payload: &ToolPayload) -> Vec<TodoItem> {
    let Some(raw_items) = payload
        .input
        .as_ref()
        .and_then(|input| input.list_field(TODOS_FIELD))
    else {
        return Vec::new();
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    raw_items
        .iter()
        .enumerate()
        .map(|(order, raw)| {
            let mut item = todo_item(raw, order);
            let count = seen.entry(item.key.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                item.key = format!("{}#{count}", item.key);
            }
            item
        })
        .collect()
}

fn todo_item(raw: &Value, order: usize) -> TodoItem {
    let content = non_empty_str(raw, "content");
    let active_form = non_empty_str(raw, "activeForm");

    let key = content
        .or(active_form)
        .map_or_else(|| fingerprint(raw), str::to_string);

    TodoItem {
        key,
        content: content.or(active_form).unwrap_or_default().to_string(),
        status: raw
            .get("status")
            .and_then(Value::as_str)
            .map(TodoStatus::parse)
            .unwrap_or_default(),
        priority: raw
            .get("priority")
            .and_then(Value::as_str)
            .map(Priority::parse)
            .unwrap_or_default(),
        order,
    }
}

fn non_empty_str<'a>(raw: &'a Value, field: &str) -> Option<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Stable key for an item with no usable text.
///
/// `serde_json` keeps object keys sorted, so equal items always
/// serialize, and therefore hash, the same.
fn fingerprint(raw: &Value) -> String {
    let digest = Sha256::digest(raw.to_string().as_bytes());
    format!("todo-{}", &hex::encode(digest)[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use serde_json::json;

    use crate::model::Level;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(secs).unwrap()
    }

    fn plan_write(id: &str, secs: i64, todos: Value) -> LogEntry {
        LogEntry::invocation(
            at(secs),
            ToolPayload::new(id, "TodoWrite").with_input(json!({ "todos": todos })),
        )
    }

    fn reduce_default(events: &[LogEntry]) -> Vec<TodoItem> {
        reduce(events, &ToolNames::default())
    }

    #[test]
    fn latest_snapshot_replaces_earlier_one() {
        let events = vec![
            plan_write("a", 1, json!([{"content": "scan ports", "status": "todo"}])),
            plan_write("b", 2, json!([{"content": "scan ports", "status": "completed"}])),
        ];

        let plan = reduce_default(&events);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].content, "scan ports");
        assert_eq!(plan[0].status, TodoStatus::Completed);
        assert_eq!(plan[0].order, 0);
    }

    #[test]
    fn latest_wins_regardless_of_interleaving() {
        let events = vec![
            plan_write("a", 1, json!([{"content": "one"}, {"content": "two"}])),
            LogEntry::message(at(2), Level::Info, "thinking"),
            LogEntry::invocation(
                at(3),
                ToolPayload::new("c", "Bash").with_input(json!({"command": "id"})),
            ),
            plan_write(
                "b",
                4,
                json!([{"content": "three"}, {"content": "four"}, {"content": "five"}]),
            ),
            LogEntry::update(at(5), ToolPayload::new("c", "Bash").with_output("uid=0")),
            LogEntry::message(at(6), Level::Success, "done"),
        ];

        let plan = reduce_default(&events);
        let contents: Vec<_> = plan.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["three", "four", "five"]);
        let orders: Vec<_> = plan.iter().map(|t| t.order).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[test]
    fn empty_list_clears_the_plan() {
        let events = vec![
            plan_write("a", 1, json!([{"content": "one"}])),
            plan_write("b", 2, json!([])),
        ];
        assert!(reduce_default(&events).is_empty());
    }

    #[test]
    fn no_plan_tool_means_empty_plan() {
        let events = vec![LogEntry::message(at(1), Level::Info, "hello")];
        assert!(reduce_default(&events).is_empty());
    }

    #[test]
    fn malformed_input_yields_empty_plan() {
        let events = vec![
            plan_write("a", 1, json!([{"content": "one"}])),
            LogEntry::invocation(
                at(2),
                ToolPayload::new("b", "TodoWrite").with_input(json!({"todos": "oops"})),
            ),
        ];
        assert!(reduce_default(&events).is_empty());
    }

    #[test]
    fn key_falls_back_to_active_form_then_fingerprint() {
        let events = vec![plan_write(
            "a",
            1,
            json!([
                {"activeForm": "Scanning ports", "status": "in_progress"},
                {"status": "todo", "priority": "high"}
            ]),
        )];

        let plan = reduce_default(&events);
        assert_eq!(plan[0].key, "Scanning ports");
        assert_eq!(plan[0].content, "Scanning ports");
        assert_eq!(plan[0].status, TodoStatus::InProgress);
        assert!(plan[1].key.starts_with("todo-"));
        assert_eq!(plan[1].content, "");
        assert_eq!(plan[1].priority, Priority::High);
    }

    #[test]
    fn fingerprint_is_stable_across_snapshots() {
        let item = json!({"status": "todo", "priority": "low"});
        let first = reduce_default(&[plan_write("a", 1, json!([item.clone()]))]);
        let second = reduce_default(&[plan_write("b", 2, json!([item]))]);
        assert_eq!(first[0].key, second[0].key);
    }

    #[test]
    fn duplicate_keys_are_disambiguated() {
        let events = vec![plan_write(
            "a",
            1,
            json!([{"content": "retry"}, {"content": "retry"}]),
        )];

        let plan = reduce_default(&events);
        assert_eq!(plan[0].key, "retry");
        assert_eq!(plan[1].key, "retry#2");
    }

    #[test]
    fn bare_array_input_is_accepted() {
        let events = vec![LogEntry::invocation(
            at(1),
            ToolPayload::new("a", "TodoWrite").with_input(json!([{"content": "one"}])),
        )];
        assert_eq!(reduce_default(&events).len(), 1);
    }

    #[test]
    fn honors_configured_tool_name() {
        let tools = ToolNames {
            plan: "PlanWrite".to_string(),
            ..ToolNames::default()
        };
        let events = vec![LogEntry::invocation(
            at(1),
            ToolPayload::new("a", "PlanWrite").with_input(json!({"todos": [{"content": "x"}]})),
        )];

        assert_eq!(reduce(&events, &tools).len(), 1);
        assert!(reduce_default(&events).is_empty());
    }

    #[test]
    fn reduce_is_idempotent() {
        let events = vec![plan_write("a", 1, json!([{"content": "one"}, {"status": "x"}]))];
        assert_eq!(reduce_default(&events), reduce_default(&events));
    }
}
