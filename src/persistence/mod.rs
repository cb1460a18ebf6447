pub mod files;
pub mod settings;
pub mod store;

pub use files::{ensure_mindful_dir, get_mindful_dir, init_local_mindful, CONFIG_FILE, LOG_FILE};
pub use settings::{load_settings, save_settings, Settings};
pub use store::{JsonFileStore, TaskStore};

#[cfg(test)]
pub use store::MemoryStore;
