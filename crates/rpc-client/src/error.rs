use thiserror::Error;

/// Transport/server errors from the Bitcoin Core RPC endpoint.
///
/// Converted to `rtxp_collaborators::ClientError`/`PublishError` at the
/// trait boundary so MTM/RTxP never name this type directly.
#[derive(Debug, Error)]
pub enum RpcClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rpc server returned error {code}: {message}")]
    Server { code: i32, message: String },

    #[error("could not parse rpc response: {0}")]
    Parse(String),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

impl From<bitcoincore_rpc_async::Error> for RpcClientError {
    /// `bitcoincore_rpc_async::Error` carries Bitcoin Core's RPC error text
    /// in its `Display` output regardless of which internal variant
    /// produced it; the core only ever inspects that text (see
    /// `classify_publish_error`), so it's preserved as-is rather than
    /// pattern-matched apart.
    fn from(err: bitcoincore_rpc_async::Error) -> Self {
        RpcClientError::Other(err.to_string())
    }
}

impl From<RpcClientError> for rtxp_collaborators::ClientError {
    fn from(err: RpcClientError) -> Self {
        rtxp_collaborators::ClientError(err.to_string())
    }
}

impl From<RpcClientError> for rtxp_collaborators::PublishError {
    fn from(err: RpcClientError) -> Self {
        rtxp_collaborators::PublishError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_survives_conversion_to_publish_error() {
        let err = RpcClientError::Server {
            code: -26,
            message: "txn-mempool-conflict, rejecting replacement".to_string(),
        };
        let publish_err: rtxp_collaborators::PublishError = err.into();
        assert!(publish_err.0.contains("rejecting replacement"));
    }
}
