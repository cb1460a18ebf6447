use super::clock::Clock;
use super::events::EngineEvent;
use super::reminders::due_reminders;
use crate::display_sync::{DisplayCommand, DisplaySync};
use crate::domain::{DeletedTask, Task, TaskDraft, TaskStatus};
use crate::persistence::TaskStore;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// The task bound to the clock, plus flags the presentation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Session {
    task_id: Uuid,
    /// Set once remaining time reaches zero; cleared only by an extension or edit
    overdue: bool,
    /// Suspended by an explicit pause (as opposed to freshly restarted)
    paused: bool,
}

/// Owns the task collections and the single active countdown
pub struct TimerEngine {
    tasks: Vec<Task>,
    deleted: Vec<DeletedTask>,
    session: Option<Session>,
    clock: Clock,
    /// Seconds removed per tick; also the reminder window
    step_secs: i64,
    store: Box<dyn TaskStore>,
    display: Box<dyn DisplaySync>,
    events: Vec<EngineEvent>,
    tasks_dirty: bool,
    deleted_dirty: bool,
    persist_failing: bool,
}

impl TimerEngine {
    /// Load both collections from the store and build an idle engine
    pub fn load(
        store: Box<dyn TaskStore>,
        display: Box<dyn DisplaySync>,
        tick_period: Duration,
    ) -> Result<Self> {
        let mut tasks = store.load_tasks().context("Failed to load tasks")?;
        let deleted = store.load_deleted().context("Failed to load deleted tasks")?;

        // Nothing is active after a reload, so nothing can still be running
        for task in &mut tasks {
            if task.status == TaskStatus::Running {
                task.status = TaskStatus::Paused;
            }
        }

        let step_secs = tick_period.as_secs().max(1) as i64;
        info!(
            "engine loaded {} tasks ({} deleted), tick {}s",
            tasks.len(),
            deleted.len(),
            step_secs
        );

        let engine = Self {
            tasks,
            deleted,
            session: None,
            clock: Clock::new(Duration::from_secs(step_secs as u64)),
            step_secs,
            store,
            display,
            events: Vec::new(),
            tasks_dirty: false,
            deleted_dirty: false,
            persist_failing: false,
        };
        engine.notify(DisplayCommand::Default);
        Ok(engine)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn deleted(&self) -> &[DeletedTask] {
        &self.deleted
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.session.map(|session| session.task_id)
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active_id().and_then(|id| self.task(id))
    }

    pub fn is_active(&self, task_id: Uuid) -> bool {
        self.active_id() == Some(task_id)
    }

    pub fn is_overdue(&self) -> bool {
        self.session.map_or(false, |session| session.overdue)
    }

    /// True while the active task was explicitly paused
    pub fn is_paused(&self) -> bool {
        self.session.map_or(false, |session| session.paused)
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some() && self.clock.is_running()
    }

    /// Drain the events produced since the last call
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Display command matching the current state
    pub fn display_state(&self) -> DisplayCommand {
        let Some(session) = self.session else {
            return DisplayCommand::Default;
        };
        let fired = self.active_task().map_or(0, Task::fired_count);

        if session.overdue {
            DisplayCommand::Overdue
        } else if session.paused {
            DisplayCommand::Pause
        } else if fired == 0 {
            DisplayCommand::TaskInitial
        } else {
            DisplayCommand::reminder(fired)
        }
    }

    pub fn create_task(&mut self, draft: &TaskDraft) -> Uuid {
        let task = Task::new(draft);
        let task_id = task.id;
        info!("created task {} ({}s)", task.name, task.total_duration);
        self.tasks.push(task);
        self.events.push(EngineEvent::Created { task_id });
        self.persist_tasks();
        task_id
    }

    /// Make `task_id` the active task and start a fresh run from its current remaining time
    pub fn start(&mut self, task_id: Uuid) -> bool {
        let Some(idx) = self.index_of(task_id) else {
            return false;
        };
        if self.tasks[idx].status.is_completed() {
            return false;
        }

        if let Some(previous) = self.session.take() {
            if previous.task_id != task_id {
                self.set_aside(previous.task_id);
            }
        }

        let task = &mut self.tasks[idx];
        task.status = TaskStatus::Running;
        task.fired_reminders.clear();
        let overdue = task.is_overdue();
        info!("started {} with {}s remaining", task.name, task.remaining_time);

        self.session = Some(Session {
            task_id,
            overdue,
            paused: false,
        });
        self.clock.start(Instant::now());
        self.events.push(EngineEvent::Started { task_id });
        self.notify(DisplayCommand::TaskInitial);

        if overdue {
            self.events.push(EngineEvent::OverdueEntered { task_id });
            self.notify(DisplayCommand::Overdue);
        }

        self.persist_tasks();
        true
    }

    /// Run every tick the clock says is due by `now`
    pub fn advance(&mut self, now: Instant) {
        let ticks = self.clock.due_ticks(now);
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// One clock period: count down, detect overdue, fire reminders, persist
    pub fn tick(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        let Some(session) = self.session else {
            return;
        };
        let Some(idx) = self.index_of(session.task_id) else {
            return;
        };
        if self.tasks[idx].status != TaskStatus::Running {
            return;
        }

        let task = &mut self.tasks[idx];
        task.remaining_time -= self.step_secs;
        let remaining = task.remaining_time;
        debug!("tick {}: {}s remaining", task.name, remaining);

        if remaining <= 0 && !session.overdue {
            info!("{} is overdue", task.name);
            self.set_overdue(true);
            self.events.push(EngineEvent::OverdueEntered {
                task_id: session.task_id,
            });
            self.notify(DisplayCommand::Overdue);
        }

        self.evaluate_reminders();
        self.persist_tasks();
    }

    /// Fire every reminder due at the active task's current remaining time
    pub fn evaluate_reminders(&mut self) {
        let Some(task_id) = self.active_id() else {
            return;
        };
        let Some(idx) = self.index_of(task_id) else {
            return;
        };

        let due = due_reminders(&self.tasks[idx], self.step_secs);
        if due.is_empty() {
            return;
        }

        for offset in due {
            let task = &mut self.tasks[idx];
            task.fired_reminders.insert(offset);
            let command = DisplayCommand::reminder(task.fired_count());
            let index = match command {
                DisplayCommand::PlayReminder(index) => index,
                _ => 1,
            };
            debug!("reminder {} fired for {} ({}s before end)", index, task.name, offset);

            self.events.push(EngineEvent::ReminderFired {
                task_id,
                index,
                offset,
            });
            self.notify(command);
        }
        self.persist_tasks();
    }

    /// Stop the clock and suspend the active task
    pub fn pause(&mut self) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        if session.paused {
            return false;
        }
        let Some(idx) = self.index_of(session.task_id) else {
            return false;
        };

        self.clock.stop();
        if let Some(active) = self.session.as_mut() {
            active.paused = true;
        }
        let task = &mut self.tasks[idx];
        if task.status == TaskStatus::Running {
            task.status = TaskStatus::Paused;
        }
        info!("paused {} at {}s", task.name, task.remaining_time);

        self.events.push(EngineEvent::Paused {
            task_id: session.task_id,
        });
        self.notify(DisplayCommand::Pause);
        self.persist_tasks();
        true
    }

    /// Continue the active task from where it stopped
    pub fn resume(&mut self) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        let Some(idx) = self.index_of(session.task_id) else {
            return false;
        };
        let task = &mut self.tasks[idx];
        if task.status.is_completed() {
            return false;
        }
        if task.status == TaskStatus::Running && self.clock.is_running() {
            return false;
        }

        task.status = TaskStatus::Running;
        let overdue = task.is_overdue();
        info!("resumed {} at {}s", task.name, task.remaining_time);

        if let Some(active) = self.session.as_mut() {
            active.paused = false;
            active.overdue = overdue;
        }
        self.clock.start(Instant::now());
        self.events.push(EngineEvent::Resumed {
            task_id: session.task_id,
        });
        if overdue && !session.overdue {
            self.events.push(EngineEvent::OverdueEntered {
                task_id: session.task_id,
            });
        }
        self.notify(self.display_state());
        self.persist_tasks();
        true
    }

    /// Finish the active task and end the session
    pub fn complete(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.clock.stop();

        if let Some(idx) = self.index_of(session.task_id) {
            let task = &mut self.tasks[idx];
            task.mark_completed();
            info!("completed {}", task.name);
        }

        self.events.push(EngineEvent::Completed {
            task_id: session.task_id,
        });
        self.notify(DisplayCommand::Default);
        self.persist_tasks();
        true
    }

    /// List checkbox: complete an open task, or reopen a completed one
    pub fn toggle_complete(&mut self, task_id: Uuid) -> bool {
        if self.is_active(task_id) {
            return self.complete();
        }
        let Some(idx) = self.index_of(task_id) else {
            return false;
        };

        let task = &mut self.tasks[idx];
        if task.status.is_completed() {
            task.restart();
            info!("reopened {}", task.name);
            self.events.push(EngineEvent::Reopened { task_id });
        } else {
            task.mark_completed();
            info!("completed {}", task.name);
            self.events.push(EngineEvent::Completed { task_id });
        }
        self.persist_tasks();
        true
    }

    /// Grant `extra` seconds to an overdue active task; the target grows by the same amount
    pub fn extend_overdue(&mut self, extra: i64) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        if !session.overdue || extra <= 0 {
            return false;
        }
        let Some(idx) = self.index_of(session.task_id) else {
            return false;
        };

        let task = &mut self.tasks[idx];
        task.extend(extra);
        let remaining = task.remaining_time;
        info!("extended {} by {}s, {}s remaining", task.name, extra, remaining);

        self.events.push(EngineEvent::Extended {
            task_id: session.task_id,
            extra,
        });
        self.events.push(EngineEvent::TimeProjected {
            task_id: session.task_id,
        });

        // Only leaving overdue re-signals the display; a short extension keeps it on overdue
        if remaining > 0 {
            self.set_overdue(false);
            self.events.push(EngineEvent::OverdueCleared {
                task_id: session.task_id,
            });
            self.notify(self.display_state());
        }

        self.persist_tasks();
        true
    }

    /// Replace name, duration and reminders, keeping the time already spent
    pub fn edit_task(&mut self, task_id: Uuid, draft: &TaskDraft) -> bool {
        let Some(idx) = self.index_of(task_id) else {
            return false;
        };

        let task = &mut self.tasks[idx];
        task.apply_draft(draft);
        let remaining = task.remaining_time;
        let completed = task.status.is_completed();
        info!(
            "edited {}: {}s target, {}s remaining",
            task.name, task.total_duration, remaining
        );
        self.events.push(EngineEvent::Edited { task_id });

        if let Some(session) = self.session.filter(|session| session.task_id == task_id) {
            self.events.push(EngineEvent::TimeProjected { task_id });

            if remaining <= 0 && !session.overdue && !completed {
                self.set_overdue(true);
                self.events.push(EngineEvent::OverdueEntered { task_id });
                self.notify(DisplayCommand::Overdue);
            } else if remaining > 0 && session.overdue {
                self.set_overdue(false);
                self.events.push(EngineEvent::OverdueCleared { task_id });
                self.notify(self.display_state());
            }
        }

        self.persist_tasks();
        true
    }

    /// Reset the task to a fresh paused run; the only way to clear history without starting
    pub fn restart(&mut self, task_id: Uuid) -> bool {
        let Some(idx) = self.index_of(task_id) else {
            return false;
        };

        let task = &mut self.tasks[idx];
        task.restart();
        info!("restarted {}", task.name);
        self.events.push(EngineEvent::Restarted { task_id });

        if self.is_active(task_id) {
            self.clock.stop();
            if let Some(session) = self.session.as_mut() {
                session.overdue = false;
                session.paused = false;
            }
            self.notify(self.display_state());
        }

        self.persist_tasks();
        true
    }

    /// Move a task into the bin; deleting the active task ends the session without completing it
    pub fn delete_task(&mut self, task_id: Uuid) -> bool {
        let Some(idx) = self.index_of(task_id) else {
            return false;
        };

        if self.is_active(task_id) {
            self.clock.stop();
            self.session = None;
            self.notify(DisplayCommand::Default);
        }

        let task = self.tasks.remove(idx);
        info!("deleted {}", task.name);
        self.deleted.push(DeletedTask::new(task));
        self.events.push(EngineEvent::Deleted { task_id });

        self.tasks_dirty = true;
        self.deleted_dirty = true;
        self.flush();
        true
    }

    /// Bring a deleted task back as a new, unstarted task
    ///
    /// `deleted_id` is the id the task had when it was deleted. Returns the new id.
    pub fn restore_task(&mut self, deleted_id: Uuid) -> Option<Uuid> {
        let pos = self
            .deleted
            .iter()
            .position(|record| record.task.id == deleted_id)?;

        let record = self.deleted.remove(pos);
        let task = record.revive();
        let task_id = task.id;
        info!("restored {}", task.name);
        self.tasks.push(task);
        self.events.push(EngineEvent::Restored { task_id });

        self.tasks_dirty = true;
        self.deleted_dirty = true;
        self.flush();
        Some(task_id)
    }

    /// Permanently discard everything in the bin
    pub fn empty_trash(&mut self) -> usize {
        let count = self.deleted.len();
        if count > 0 {
            self.deleted.clear();
            info!("emptied {} deleted tasks", count);
            self.deleted_dirty = true;
            self.flush();
        }
        count
    }

    pub fn begin_mindful_break(&mut self) {
        info!("mindful break started");
        self.notify(DisplayCommand::MindfulBreak);
    }

    pub fn end_mindful_break(&mut self) {
        info!("mindful break ended");
        self.notify(self.display_state());
    }

    fn index_of(&self, task_id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == task_id)
    }

    fn set_overdue(&mut self, overdue: bool) {
        if let Some(session) = self.session.as_mut() {
            session.overdue = overdue;
        }
    }

    /// End a session because another task takes over; no completion side effects
    fn set_aside(&mut self, task_id: Uuid) {
        self.clock.stop();
        if let Some(idx) = self.index_of(task_id) {
            let task = &mut self.tasks[idx];
            if task.status == TaskStatus::Running {
                task.status = TaskStatus::Paused;
            }
            debug!("set aside {}", task.name);
        }
        self.events.push(EngineEvent::SessionEnded { task_id });
    }

    fn notify(&self, command: DisplayCommand) {
        if let Err(err) = self.display.send(command) {
            warn!("display sync failed for {}: {:#}", command.name(), err);
        }
    }

    fn persist_tasks(&mut self) {
        self.tasks_dirty = true;
        self.flush();
    }

    /// Write dirty collections; a failed write stays dirty and is retried on the next flush
    fn flush(&mut self) {
        let mut failure = None;

        if self.tasks_dirty {
            match self.store.save_tasks(&self.tasks) {
                Ok(()) => self.tasks_dirty = false,
                Err(err) => failure = Some(format!("{:#}", err)),
            }
        }
        if self.deleted_dirty {
            match self.store.save_deleted(&self.deleted) {
                Ok(()) => self.deleted_dirty = false,
                Err(err) => failure = Some(format!("{:#}", err)),
            }
        }

        match failure {
            Some(message) => {
                if !self.persist_failing {
                    warn!("failed to save tasks, will retry: {}", message);
                    self.events.push(EngineEvent::PersistFailed { message });
                }
                self.persist_failing = true;
            }
            None => {
                if self.persist_failing {
                    info!("saving tasks works again");
                }
                self.persist_failing = false;
            }
        }
    }
}
