use std::fmt;

use crate::PublishId;

/// Immutable identity of a single publish attempt, threaded through every
/// event and `tracing` span it produces.
#[derive(Clone, Debug)]
pub struct LogContext {
    pub publish_id: PublishId,
    pub channel_id: Option<String>,
    pub remote_node_id: Option<String>,
    pub tx_desc: String,
}

impl LogContext {
    pub fn new(tx_desc: impl Into<String>) -> Self {
        Self {
            publish_id: PublishId::new(),
            channel_id: None,
            remote_node_id: None,
            tx_desc: tx_desc.into(),
        }
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_remote_node_id(mut self, remote_node_id: impl Into<String>) -> Self {
        self.remote_node_id = Some(remote_node_id.into());
        self
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "publish_id={} desc={} channel_id={} remote_node_id={}",
            self.publish_id,
            self.tx_desc,
            self.channel_id.as_deref().unwrap_or("-"),
            self.remote_node_id.as_deref().unwrap_or("-"),
        )
    }
}
