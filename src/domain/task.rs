use super::enums::TaskStatus;
use crate::error::ValidationError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Validated input for creating or editing a task
///
/// The engine only ever receives drafts, so it never has to reject a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    total_duration: i64,
    reminders: BTreeSet<i64>,
}

impl TaskDraft {
    pub fn new(
        name: &str,
        total_duration: i64,
        reminders: impl IntoIterator<Item = i64>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if total_duration <= 0 {
            return Err(ValidationError::NonPositiveDuration(total_duration));
        }

        Ok(Self {
            name: name.to_string(),
            total_duration,
            reminders: reminders.into_iter().collect(),
        })
    }
}

/// A to-do item with a countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// Target duration in seconds
    pub total_duration: i64,
    /// Seconds left; negative once overdue
    pub remaining_time: i64,
    pub status: TaskStatus,
    /// Offsets (seconds before end) at which a reminder fires
    #[serde(default)]
    pub reminders: BTreeSet<i64>,
    /// Offsets already fired in the current run
    #[serde(default)]
    pub fired_reminders: BTreeSet<i64>,
    pub created_at: DateTime<Local>,
}

impl Task {
    pub fn new(draft: &TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            total_duration: draft.total_duration,
            remaining_time: draft.total_duration,
            status: TaskStatus::Paused,
            reminders: draft.reminders.clone(),
            fired_reminders: BTreeSet::new(),
            created_at: Local::now(),
        }
    }

    /// Seconds actually spent; exceeds `total_duration` once overdue
    pub fn elapsed(&self) -> i64 {
        self.total_duration - self.remaining_time
    }

    pub fn is_overdue(&self) -> bool {
        self.remaining_time <= 0
    }

    /// Apply an edit while preserving how much time has already passed
    pub fn apply_draft(&mut self, draft: &TaskDraft) {
        self.name = draft.name.clone();

        if self.status.is_completed() {
            // A finished task has no countdown to rescale
            self.total_duration = draft.total_duration;
        } else {
            let elapsed = self.elapsed();
            self.total_duration = draft.total_duration;
            self.remaining_time = draft.total_duration - elapsed;
        }

        self.reminders = draft.reminders.clone();
        let kept = self
            .fired_reminders
            .intersection(&self.reminders)
            .copied()
            .collect();
        self.fired_reminders = kept;
    }

    /// Reset the countdown to a fresh, paused run
    pub fn restart(&mut self) {
        self.remaining_time = self.total_duration;
        self.status = TaskStatus::Paused;
        self.fired_reminders.clear();
    }

    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
        self.remaining_time = 0;
        self.fired_reminders.clear();
    }

    /// Grow both the remaining time and the target by `extra` seconds
    pub fn extend(&mut self, extra: i64) {
        self.remaining_time = self.remaining_time.saturating_add(extra);
        self.total_duration = self.total_duration.saturating_add(extra);
    }

    /// Fraction of the target still left, clamped to 0.0..=1.0
    pub fn progress_ratio(&self) -> f64 {
        if self.total_duration <= 0 {
            return 0.0;
        }
        (self.remaining_time as f64 / self.total_duration as f64).clamp(0.0, 1.0)
    }

    /// Reminder positions along the progress bar (0.0 = start, 1.0 = end)
    ///
    /// Offsets that can never be reached under the current duration are skipped.
    pub fn reminder_positions(&self) -> Vec<(i64, f64)> {
        if self.total_duration <= 0 {
            return Vec::new();
        }
        self.reminders
            .iter()
            .rev()
            .filter(|&&offset| offset > 0 && offset < self.total_duration)
            .map(|&offset| {
                let position = (self.total_duration - offset) as f64 / self.total_duration as f64;
                (offset, position)
            })
            .collect()
    }

    pub fn fired_count(&self) -> usize {
        self.fired_reminders.len()
    }
}

/// A task snapshot sitting in the deleted bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTask {
    pub task: Task,
    pub deleted_at: DateTime<Local>,
}

impl DeletedTask {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            deleted_at: Local::now(),
        }
    }

    /// Build the fresh live task a restore produces
    pub fn revive(&self) -> Task {
        Task {
            id: Uuid::new_v4(),
            name: self.task.name.clone(),
            total_duration: self.task.total_duration,
            remaining_time: self.task.total_duration,
            status: TaskStatus::Paused,
            reminders: self.task.reminders.clone(),
            fired_reminders: BTreeSet::new(),
            created_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(total: i64, remaining: i64) -> Task {
        let draft = TaskDraft::new("Article Reading", total, [60, 120]).unwrap();
        let mut task = Task::new(&draft);
        task.remaining_time = remaining;
        task
    }

    #[test]
    fn test_draft_trims_and_validates() {
        let draft = TaskDraft::new("  Bike Sketch  ", 1800, [300]).unwrap();
        assert_eq!(draft.name, "Bike Sketch");
        assert_eq!(draft.total_duration, 1800);

        assert_eq!(TaskDraft::new("   ", 60, []), Err(ValidationError::EmptyName));
        assert_eq!(
            TaskDraft::new("x", 0, []),
            Err(ValidationError::NonPositiveDuration(0))
        );
        assert_eq!(
            TaskDraft::new("x", -5, []),
            Err(ValidationError::NonPositiveDuration(-5))
        );
    }

    #[test]
    fn test_new_task_starts_full_and_paused() {
        let draft = TaskDraft::new("HCI Quiz Preparation", 2700, [120, 60, 120]).unwrap();
        let task = Task::new(&draft);
        assert_eq!(task.status, TaskStatus::Paused);
        assert_eq!(task.remaining_time, 2700);
        assert_eq!(task.reminders.len(), 2);
        assert!(task.fired_reminders.is_empty());
    }

    #[test]
    fn test_apply_draft_preserves_elapsed() {
        let mut t = task(600, 400);
        t.apply_draft(&TaskDraft::new("Article Reading", 900, [60, 120]).unwrap());
        assert_eq!(t.remaining_time, 700);

        let mut overdue = task(600, -120);
        overdue.apply_draft(&TaskDraft::new("Article Reading", 300, [60]).unwrap());
        assert_eq!(overdue.remaining_time, -420);
        assert!(overdue.is_overdue());
    }

    #[test]
    fn test_apply_draft_keeps_only_surviving_fired_offsets() {
        let mut t = task(600, 50);
        t.fired_reminders.insert(120);
        t.fired_reminders.insert(60);

        t.apply_draft(&TaskDraft::new("Article Reading", 600, [60, 300]).unwrap());
        assert_eq!(t.fired_reminders, BTreeSet::from([60]));
    }

    #[test]
    fn test_apply_draft_on_completed_task_keeps_zero() {
        let mut t = task(600, 0);
        t.mark_completed();
        t.apply_draft(&TaskDraft::new("Article Reading", 900, []).unwrap());
        assert_eq!(t.total_duration, 900);
        assert_eq!(t.remaining_time, 0);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut t = task(600, -30);
        t.status = TaskStatus::Running;
        t.fired_reminders.insert(60);
        t.restart();
        assert_eq!(t.remaining_time, 600);
        assert_eq!(t.status, TaskStatus::Paused);
        assert!(t.fired_reminders.is_empty());
    }

    #[test]
    fn test_extend_grows_target() {
        let mut t = task(600, -30);
        t.extend(60);
        assert_eq!(t.remaining_time, 30);
        assert_eq!(t.total_duration, 660);

        t.extend(i64::MAX);
        assert_eq!(t.total_duration, i64::MAX);
    }

    #[test]
    fn test_progress_ratio_is_clamped() {
        assert_eq!(task(600, 300).progress_ratio(), 0.5);
        assert_eq!(task(600, -60).progress_ratio(), 0.0);
    }

    #[test]
    fn test_reminder_positions_skip_unreachable_offsets() {
        let draft = TaskDraft::new("Programming exercises", 600, [60, 300, 600, 900]).unwrap();
        let t = Task::new(&draft);
        let positions = t.reminder_positions();
        assert_eq!(positions, vec![(300, 0.5), (60, 0.9)]);
    }

    #[test]
    fn test_revive_creates_fresh_task() {
        let mut original = task(600, -90);
        original.status = TaskStatus::Running;
        original.fired_reminders.insert(120);
        let record = DeletedTask::new(original.clone());

        let revived = record.revive();
        assert_ne!(revived.id, original.id);
        assert_eq!(revived.name, original.name);
        assert_eq!(revived.reminders, original.reminders);
        assert_eq!(revived.remaining_time, 600);
        assert_eq!(revived.status, TaskStatus::Paused);
        assert!(revived.fired_reminders.is_empty());
    }

    #[test]
    fn test_task_json_uses_camel_case_keys() {
        let t = task(600, 600);
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("totalDuration").is_some());
        assert!(json.get("remainingTime").is_some());
        assert!(json.get("firedReminders").is_some());
    }
}
