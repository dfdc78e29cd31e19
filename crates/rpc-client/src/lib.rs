mod client;
mod error;
mod fee;
mod test_client;

pub use client::BitcoinRpcClient;
pub use error::RpcClientError;
pub use test_client::FakeBlockchainClient;
