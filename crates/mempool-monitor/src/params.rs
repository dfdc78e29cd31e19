use rtxp_collaborators::FundedTx;
use rtxp_primitives::{OutputRef, PublishId};

/// Everything a single MTM run needs: the signed attempt to publish, the
/// claimed input (for probing on eviction/rejection), and the log context
/// fields threaded into its emitted events.
#[derive(Debug, Clone)]
pub struct MtmParams {
    pub funded_tx: FundedTx,
    pub input_outpoint: OutputRef,
    pub desc: String,
    pub min_depth_blocks: u32,
    pub publish_id: PublishId,
    pub channel_id: Option<String>,
    pub remote_node_id: Option<String>,
}
