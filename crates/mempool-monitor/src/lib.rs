mod decision;
mod error;
mod handle;
mod params;
mod task;

pub use decision::classify_input_status;
pub use error::MonitorError;
pub use handle::spawn_mtm;
pub use params::MtmParams;
