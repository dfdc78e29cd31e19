use bitcoin::Network;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BitcoindConfig {
    pub rpc_url: String,
    pub rpc_user: String,
    pub rpc_password: String,
    pub network: Network,
}

/// `remaining` (confirm_before − current_height) → fee-estimator block target,
/// per the target-feerate policy. Deliberately non-monotonic near the top of
/// the table to accelerate aggressiveness as the deadline approaches.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockTargetRung {
    /// Apply this rung when `remaining >= min_remaining`.
    pub min_remaining: u64,
    pub block_target: u16,
}

/// Recognized options for a replaceable-transaction publisher instance.
///
/// A plain struct; this crate has no opinion on where the values come from —
/// a consuming binary may populate it from TOML, environment variables, or
/// hardcoded test values.
#[derive(Debug, Clone, Deserialize)]
pub struct RtxpConfig {
    /// Confirmations required before a tracked transaction is declared
    /// `TxConfirmed`.
    pub min_depth_blocks: u32,

    /// Upper bound, in milliseconds, of the random jitter applied before
    /// issuing a `CheckFee` after observing a transaction enter the mempool.
    pub max_tx_publish_retry_delay_ms: u64,

    /// Minimum multiplicative bump applied to the prior feerate, per
    /// BIP-125 rule 4.
    pub bump_ratio: f64,

    /// `remaining → block target` ladder, ordered from largest
    /// `min_remaining` to smallest. The first rung whose `min_remaining` is
    /// `<= remaining` applies.
    pub block_target_ladder: Vec<BlockTargetRung>,

    pub bitcoind_rpc: BitcoindConfig,
}

impl RtxpConfig {
    /// Block target to use for the fee estimator, given the number of
    /// blocks remaining before `confirm_before`.
    pub fn block_target_for_remaining(&self, remaining: i64) -> u16 {
        self.block_target_ladder
            .iter()
            .find(|rung| remaining >= rung.min_remaining as i64)
            .map(|rung| rung.block_target)
            .unwrap_or(1)
    }
}

impl Default for RtxpConfig {
    fn default() -> Self {
        Self {
            min_depth_blocks: 3,
            max_tx_publish_retry_delay_ms: 30_000,
            bump_ratio: 1.20,
            block_target_ladder: default_block_target_ladder(),
            bitcoind_rpc: BitcoindConfig {
                rpc_url: "http://localhost:18443".to_string(),
                rpc_user: "user".to_string(),
                rpc_password: "pass".to_string(),
                network: Network::Regtest,
            },
        }
    }
}

/// The `remaining → block target` table from the target-feerate policy.
pub fn default_block_target_ladder() -> Vec<BlockTargetRung> {
    vec![
        BlockTargetRung {
            min_remaining: 144,
            block_target: 144,
        },
        BlockTargetRung {
            min_remaining: 72,
            block_target: 72,
        },
        BlockTargetRung {
            min_remaining: 36,
            block_target: 36,
        },
        BlockTargetRung {
            min_remaining: 18,
            block_target: 12,
        },
        BlockTargetRung {
            min_remaining: 12,
            block_target: 6,
        },
        BlockTargetRung {
            min_remaining: 2,
            block_target: 2,
        },
        BlockTargetRung {
            min_remaining: 0,
            block_target: 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_picks_highest_matching_rung() {
        let cfg = RtxpConfig::default();
        assert_eq!(cfg.block_target_for_remaining(900), 144);
        assert_eq!(cfg.block_target_for_remaining(100), 72);
        assert_eq!(cfg.block_target_for_remaining(40), 36);
        assert_eq!(cfg.block_target_for_remaining(20), 12);
        assert_eq!(cfg.block_target_for_remaining(12), 6);
        assert_eq!(cfg.block_target_for_remaining(5), 2);
        assert_eq!(cfg.block_target_for_remaining(1), 1);
        assert_eq!(cfg.block_target_for_remaining(0), 1);
    }

    #[test]
    fn deserializes_from_toml() {
        let toml_str = r#"
            min_depth_blocks = 6
            max_tx_publish_retry_delay_ms = 15000
            bump_ratio = 1.25

            [[block_target_ladder]]
            min_remaining = 6
            block_target = 3

            [bitcoind_rpc]
            rpc_url = "http://localhost:18443"
            rpc_user = "user"
            rpc_password = "pass"
            network = "regtest"
        "#;

        let cfg: RtxpConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.min_depth_blocks, 6);
        assert_eq!(cfg.block_target_ladder.len(), 1);
        assert_eq!(cfg.bitcoind_rpc.rpc_url, "http://localhost:18443");
    }
}
