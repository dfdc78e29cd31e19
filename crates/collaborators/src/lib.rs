mod classify;
mod cmd;
mod funded_tx;
mod result;
mod traits;
mod witness;

pub use classify::{classify_publish_error, PublishErrorClass};
pub use cmd::{ReplaceableTxCmd, TxInfo};
pub use funded_tx::FundedTx;
pub use result::{PublishTxResult, TxResult};
pub use traits::{
    BlockchainClient, ClientError, FeeEstimator, PublishError, TimeLockMonitor, TxFunder,
    TxPrePublisher, TxWithWitnessData,
};
pub use witness::WitnessData;

pub use result::TxRejectedReason;
