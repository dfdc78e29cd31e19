//! Small, dependency-light types shared by the publisher, the monitor, and
//! the blockchain-client crates.

pub mod feerate;
pub mod log_ctx;
pub mod outpoint;
pub mod publish_id;

pub use feerate::Feerate;
pub use log_ctx::LogContext;
pub use outpoint::OutputRef;
pub use publish_id::PublishId;

/// Height of a block in the best chain, as reported by the blockchain client.
pub type BlockHeight = u64;
