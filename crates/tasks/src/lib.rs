mod executor;

pub use executor::{ShutdownSignal, TaskExecutor, TaskManager};
