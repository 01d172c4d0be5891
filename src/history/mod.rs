mod stack;
mod storage;
mod store;

pub use stack::{HistoryStep, apply};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use store::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_KEY, HistoryStore};
