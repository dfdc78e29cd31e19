mod config;

pub use config::{default_block_target_ladder, BitcoindConfig, BlockTargetRung, RtxpConfig};
