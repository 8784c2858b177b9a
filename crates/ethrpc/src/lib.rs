//! Client side access to Ethereum nodes.
//!
//! Calls go either straight to a node speaking JSON RPC over HTTP, where
//! concurrently issued calls are transparently merged into batch requests,
//! or through the Etherscan REST API for the subset of methods it can
//! answer. [`Client`] hides which of the two is in use.

pub mod arguments;
pub mod buffered;
pub mod client;
pub mod errors;
pub mod etherscan;
pub mod http;
pub mod jsonrpc;
pub mod lock;

pub use {
    arguments::{Arguments, client},
    client::{BlockTag, CallArgs, Client, Request, RpcCall},
    errors::{Error, RpcError, RpcFlavour, TransportError},
    etherscan::EtherscanTransport,
    jsonrpc::{JsonRpcOptions, JsonRpcTransport},
    lock::LockTable,
};
