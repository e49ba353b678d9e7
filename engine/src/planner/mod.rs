//! Task Planner
//!
//! Classifies open tasks by urgency and turns the task list into the prompts
//! sent to the local model. Everything here is a pure function of its inputs,
//! so concurrent requests can call into it without coordination.
//!
//! # Classification
//!
//! Each task is run through an ordered chain of checks; the first one that
//! matches wins:
//!
//! 1. Completed tasks are never flagged
//! 2. Deadline before today: [`Urgency::Overdue`]
//! 3. Due today or tomorrow, or priority 1: [`Urgency::Urgent`]
//! 4. Anything else: [`Urgency::Unclassified`]
//!
//! A deadline that is not a `YYYY-MM-DD` date aborts the whole classification
//! with [`EngineError::MalformedDeadline`].

use chrono::NaiveDate;
use sdk::{EngineError, NewTask, TaskSummary};
use serde::Serialize;

pub mod prompts;

pub use prompts::{compose_query_prompt, compose_schedule_prompt, render_query_prompt};

/// Format every deadline must follow
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Priority value that always makes an open task urgent
pub const URGENT_PRIORITY: i64 = 1;

/// Days-until-deadline at or below which an open task is urgent
pub const URGENT_WITHIN_DAYS: i64 = 1;

/// Urgency tag for a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Overdue,
    Urgent,
    Unclassified,
}

impl Urgency {
    /// Classify one task relative to `today`
    pub fn of(task: &TaskSummary, today: NaiveDate) -> Result<Self, EngineError> {
        let deadline = parse_deadline(&task.title, &task.deadline)?;

        if task.completed {
            return Ok(Urgency::Unclassified);
        }

        let days_until = (deadline - today).num_days();

        let urgency = if days_until < 0 {
            Urgency::Overdue
        } else if days_until <= URGENT_WITHIN_DAYS || task.priority == URGENT_PRIORITY {
            Urgency::Urgent
        } else {
            Urgency::Unclassified
        };

        Ok(urgency)
    }
}

/// Overdue and urgent subsets of a task list
///
/// Both lists borrow from the classified input and keep its order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    pub overdue: Vec<&'a TaskSummary>,
    pub urgent: Vec<&'a TaskSummary>,
}

impl Classification<'_> {
    /// True when nothing needs an alert
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.urgent.is_empty()
    }
}

/// Split `tasks` into overdue and urgent lists
///
/// Fails on the first malformed deadline; no task is silently dropped.
pub fn classify(tasks: &[TaskSummary], today: NaiveDate) -> Result<Classification<'_>, EngineError> {
    let mut classification = Classification::default();

    for task in tasks {
        match Urgency::of(task, today)? {
            Urgency::Overdue => classification.overdue.push(task),
            Urgency::Urgent => classification.urgent.push(task),
            Urgency::Unclassified => {}
        }
    }

    tracing::debug!(
        total = tasks.len(),
        overdue = classification.overdue.len(),
        urgent = classification.urgent.len(),
        "Classified tasks"
    );

    Ok(classification)
}

/// Parse a deadline string into a calendar date
pub fn parse_deadline(title: &str, deadline: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(deadline, DEADLINE_FORMAT).map_err(|_| {
        EngineError::MalformedDeadline {
            title: title.to_string(),
            deadline: deadline.to_string(),
        }
    })
}

/// Check a task before it is stored
///
/// Rejecting bad deadlines here keeps a single malformed row from breaking
/// every later classification.
pub fn validate_new_task(task: &NewTask) -> Result<(), EngineError> {
    if task.title.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "task title must not be empty".to_string(),
        ));
    }

    parse_deadline(&task.title, &task.deadline)?;
    Ok(())
}
