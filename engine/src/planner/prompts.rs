//! Prompt templates
//!
//! Two independent templates live here: the question-answering prompt,
//! which carries overdue/urgent alerts, and the 7-day schedule prompt,
//! which never classifies. Their wording overlaps but they are maintained
//! separately; do not merge them.

use chrono::NaiveDate;
use sdk::{EngineError, TaskSummary};

use super::{classify, Classification};

/// Opening line of the question-answering prompt
pub const PERSONA_PREAMBLE: &str = "You are TaskOptima, an advanced AI assistant for productivity.";

pub const OVERDUE_HEADER: &str = "⚠️ Overdue Tasks:";

pub const URGENT_HEADER: &str = "⚡ Urgent Tasks:";

pub const TASK_LIST_HEADER: &str = "Here is the user's current task list:";

/// Behavioral instructions appended after the task enumeration
pub const QUERY_INSTRUCTIONS: &str = "Instructions:
- If the user asks for a schedule, planning, or how to organize their week, suggest a daily plan that balances deadlines and priorities, and mention which tasks should be done each day. Group tasks by urgency and due date.
- If the user asks about a large or complex task (like 'write a report', 'prepare a presentation', or 'finish a project'), suggest breaking it into smaller, manageable subtasks and give concrete examples if possible.
- If any tasks are overdue or urgent, alert the user clearly.
- Recommend what to focus on and why.
";

pub const QUESTION_LABEL: &str = "User's question:";

/// Closing cue inviting the model to reply
pub const REPLY_CUE: &str = "TaskOptima's reply:";

pub const SCHEDULE_PREAMBLE: &str =
    "You are a productivity AI. Here is the user's current task list:";

pub const SCHEDULE_INSTRUCTION: &str =
    "Suggest a 7-day plan for completing these tasks, balancing priorities and deadlines.";

/// Classify `tasks` against `today` and build the question-answering prompt
///
/// The caller passes only incomplete tasks. If any deadline fails to parse
/// no prompt is produced.
pub fn compose_query_prompt(
    tasks: &[TaskSummary],
    question: &str,
    today: NaiveDate,
) -> Result<String, EngineError> {
    let classification = classify(tasks, today)?;
    Ok(render_query_prompt(tasks, &classification, question))
}

/// Build the question-answering prompt from an existing classification
pub fn render_query_prompt(
    tasks: &[TaskSummary],
    classification: &Classification<'_>,
    question: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(PERSONA_PREAMBLE);
    prompt.push('\n');

    if !classification.overdue.is_empty() {
        prompt.push_str(OVERDUE_HEADER);
        prompt.push('\n');
        for task in &classification.overdue {
            prompt.push_str(&format!("- {} (deadline: {})\n", task.title, task.deadline));
        }
    }

    if !classification.urgent.is_empty() {
        prompt.push_str(URGENT_HEADER);
        prompt.push('\n');
        for task in &classification.urgent {
            prompt.push_str(&format!(
                "- {} (priority: {}, deadline: {})\n",
                task.title, task.priority, task.deadline
            ));
        }
    }

    prompt.push_str(TASK_LIST_HEADER);
    prompt.push('\n');
    let enumeration: Vec<String> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            format!(
                "{}. Task: {}\n   Priority: {}\n   Deadline: {}",
                i + 1,
                task.title,
                task.priority,
                task.deadline
            )
        })
        .collect();
    prompt.push_str(&enumeration.join("\n"));
    prompt.push_str("\n\n");

    prompt.push_str(QUERY_INSTRUCTIONS);
    prompt.push_str(&format!("{} {}\n", QUESTION_LABEL, question));
    prompt.push_str(REPLY_CUE);

    prompt
}

/// Build the 7-day schedule prompt
///
/// Completed tasks are left out. No urgency classification happens here, so
/// malformed deadlines are passed through verbatim.
pub fn compose_schedule_prompt(tasks: &[TaskSummary]) -> String {
    let lines: Vec<String> = tasks
        .iter()
        .filter(|task| !task.completed)
        .map(|task| {
            format!(
                "- {} (priority: {}, deadline: {})",
                task.title, task.priority, task.deadline
            )
        })
        .collect();

    format!(
        "{}\n{}\n{}",
        SCHEDULE_PREAMBLE,
        lines.join("\n"),
        SCHEDULE_INSTRUCTION
    )
}
