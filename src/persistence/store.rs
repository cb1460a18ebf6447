use super::files::{atomic_write, read_file, DELETED_FILE, TASKS_FILE};
use crate::domain::{DeletedTask, Task};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Durable home for the two task collections
///
/// Writes replace the whole collection; the last write wins.
pub trait TaskStore {
    fn load_tasks(&self) -> Result<Vec<Task>>;
    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()>;
    fn load_deleted(&self) -> Result<Vec<DeletedTask>>;
    fn save_deleted(&mut self, deleted: &[DeletedTask]) -> Result<()>;
}

/// JSON files in the data directory, one per collection
pub struct JsonFileStore {
    tasks_path: PathBuf,
    deleted_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            tasks_path: dir.join(TASKS_FILE),
            deleted_path: dir.join(DELETED_FILE),
        }
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = read_file(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    atomic_write(path, &json)
}

impl TaskStore for JsonFileStore {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        load_collection(&self.tasks_path)
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        save_collection(&self.tasks_path, tasks)
    }

    fn load_deleted(&self) -> Result<Vec<DeletedTask>> {
        load_collection(&self.deleted_path)
    }

    fn save_deleted(&mut self, deleted: &[DeletedTask]) -> Result<()> {
        save_collection(&self.deleted_path, deleted)
    }
}

/// In-memory store shared between a test and the engine under test
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: std::rc::Rc<std::cell::RefCell<MemoryInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MemoryInner {
    tasks: Vec<Task>,
    deleted: Vec<DeletedTask>,
    fail_writes: bool,
    task_writes: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().tasks = tasks;
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.borrow().tasks.clone()
    }

    pub fn deleted(&self) -> Vec<DeletedTask> {
        self.inner.borrow().deleted.clone()
    }

    pub fn task_writes(&self) -> usize {
        self.inner.borrow().task_writes
    }
}

#[cfg(test)]
impl TaskStore for MemoryStore {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.inner.borrow().tasks.clone())
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            anyhow::bail!("disk full");
        }
        inner.tasks = tasks.to_vec();
        inner.task_writes += 1;
        Ok(())
    }

    fn load_deleted(&self) -> Result<Vec<DeletedTask>> {
        Ok(self.inner.borrow().deleted.clone())
    }

    fn save_deleted(&mut self, deleted: &[DeletedTask]) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            anyhow::bail!("disk full");
        }
        inner.deleted = deleted.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_task(name: &str) -> Task {
        Task::new(&TaskDraft::new(name, 600, [60, 120]).unwrap())
    }

    #[test]
    fn test_missing_files_load_empty() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        assert!(store.load_tasks().unwrap().is_empty());
        assert!(store.load_deleted().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_tasks() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let mut task = sample_task("Article Reading");
        task.remaining_time = -45;
        task.fired_reminders.insert(60);
        store.save_tasks(&[task.clone()]).unwrap();

        let loaded = store.load_tasks().unwrap();
        assert_eq!(loaded, vec![task]);
        assert!(temp_dir.path().join(TASKS_FILE).exists());
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        store
            .save_tasks(&[sample_task("One"), sample_task("Two")])
            .unwrap();
        store.save_tasks(&[sample_task("Three")]).unwrap();

        let loaded = store.load_tasks().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Three");
    }

    #[test]
    fn test_save_and_load_deleted() {
        let temp_dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        let record = DeletedTask::new(sample_task("Bike Sketch"));
        store.save_deleted(&[record.clone()]).unwrap();

        assert_eq!(store.load_deleted().unwrap(), vec![record]);
        assert!(store.load_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join(TASKS_FILE), "{not json").unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        assert!(store.load_tasks().is_err());
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let mut store = MemoryStore::default();
        store.fail_writes(true);
        assert!(store.save_tasks(&[sample_task("x")]).is_err());
        assert_eq!(store.task_writes(), 0);

        store.fail_writes(false);
        store.save_tasks(&[sample_task("x")]).unwrap();
        assert_eq!(store.task_writes(), 1);
        assert_eq!(store.tasks().len(), 1);
    }
}
