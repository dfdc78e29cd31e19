use async_trait::async_trait;
use bitcoincore_rpc_async::RpcApi;
use rtxp_collaborators::{ClientError, FeeEstimator};
use rtxp_common::retry::{policies::ExponentialBackoff, retry_with_backoff, DEFAULT_CALL_MAX_RETRIES};
use rtxp_primitives::Feerate;

use crate::{client::BitcoinRpcClient, error::RpcClientError};

#[async_trait]
impl FeeEstimator for BitcoinRpcClient {
    async fn get_feerate_per_kw(&self, block_target: u16) -> Result<Feerate, ClientError> {
        let estimate = retry_with_backoff(
            "estimate_smart_fee",
            DEFAULT_CALL_MAX_RETRIES,
            &ExponentialBackoff::default(),
            || self.inner().estimate_smart_fee(block_target, None),
        )
        .await
        .map_err(RpcClientError::from)?;

        let Some(fee_rate_btc_per_kvb) = estimate.fee_rate else {
            return Err(ClientError(format!(
                "no fee estimate available at target {block_target}"
            )));
        };

        // sat/kvB -> sat/kw is a division by 4 (1 weight unit = 1/4 vbyte).
        let sat_per_kvb = fee_rate_btc_per_kvb.to_sat();
        Ok(Feerate::from_sat_per_kw(sat_per_kvb / 4))
    }
}
