use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed endpoint, API key or HTTP option.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The explorer has no equivalent for the requested RPC method.
    #[error("unsupported method {0}")]
    UnsupportedMethod(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] number::Error),
}

/// Which backend reported an [`RpcError`]. Only changes how the error is
/// rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcFlavour {
    JsonRpc,
    Etherscan,
}

impl RpcFlavour {
    fn prefix(&self) -> &'static str {
        match self {
            RpcFlavour::JsonRpc => "JsonRPC",
            RpcFlavour::Etherscan => "EtherscanHTTP",
        }
    }
}

/// An application level error reported by the remote side.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}({}): {}", .flavour.prefix(), .code, .message)]
pub struct RpcError {
    pub flavour: RpcFlavour,
    pub code: String,
    pub message: String,
}

impl RpcError {
    pub fn json_rpc(code: &Value, message: impl Into<String>) -> Self {
        Self {
            flavour: RpcFlavour::JsonRpc,
            code: render(code),
            message: message.into(),
        }
    }

    pub fn etherscan(code: &Value, message: impl Into<String>) -> Self {
        Self {
            flavour: RpcFlavour::Etherscan,
            code: render(code),
            message: message.into(),
        }
    }
}

/// Failure to get a usable response at all. Cloneable because one failed
/// batch fails every call that was part of it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode request: {0}")]
    Encode(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("node sent no response for request {0}")]
    MissingResponse(u64),

    #[error("request was dropped before a response arrived")]
    Dropped,
}

/// Renders a JSON value the way it appears in messages and query strings:
/// strings verbatim, everything else as JSON text.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
