use chrono::{DateTime, Utc};

use super::order::{OrderStatus, StatusHistoryEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStep {
    pub status: OrderStatus,
    pub label: &'static str,
    pub timestamp: Option<DateTime<Utc>>,
    pub details: Option<String>,
    pub completed: bool,
}

/// Projects the history log onto the five canonical stages.
///
/// A stage is completed when it has a history row or when it sits at or
/// before the current status, even without a row of its own.
pub fn build_timeline(current: OrderStatus, history: &[StatusHistoryEntry]) -> Vec<TimelineStep> {
    OrderStatus::ALL
        .into_iter()
        .map(|stage| {
            let entry = history.iter().find(|h| h.status == stage.as_str());
            TimelineStep {
                status: stage,
                label: stage.label(),
                timestamp: entry.map(|h| h.created_at),
                details: entry.and_then(|h| h.details.clone()),
                completed: entry.is_some() || stage.position() <= current.position(),
            }
        })
        .collect()
}
