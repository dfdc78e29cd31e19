use std::sync::Arc;

use rtxp_collaborators::{BlockchainClient, FeeEstimator, TimeLockMonitor, TxFunder, TxPrePublisher};
use rtxp_config::RtxpConfig;
use rtxp_status::EventSink;

/// Everything one RTxP instance needs from the outside world, bundled so
/// `spawn_rtxp` takes one argument instead of six.
#[derive(Clone)]
pub struct RtxpDeps {
    pub pre_publisher: Arc<dyn TxPrePublisher>,
    pub time_lock_monitor: Arc<dyn TimeLockMonitor>,
    pub funder: Arc<dyn TxFunder>,
    pub blockchain: Arc<dyn BlockchainClient>,
    pub fee_estimator: Arc<dyn FeeEstimator>,
    pub sink: Arc<dyn EventSink>,
    pub config: Arc<RtxpConfig>,
}
