//! Transport independent entry point for callers.

use {
    crate::{Error, etherscan::EtherscanTransport, jsonrpc::JsonRpcTransport},
    num::{BigUint, Zero},
    number::{Quantity, hex},
    serde_json::{Map, Value},
    std::{
        fmt::{self, Debug, Formatter},
        sync::Arc,
    },
};

/// Address used as `from` when a call does not specify one.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Executes one RPC method. Implemented by every transport.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait RpcCall: Send + Sync {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error>;
}

#[async_trait::async_trait]
impl RpcCall for JsonRpcTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        self.execute(method, params).await
    }
}

#[async_trait::async_trait]
impl RpcCall for EtherscanTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        self.execute(method, params).await
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockTag {
    #[default]
    Latest,
    Earliest,
    Pending,
    Number(u64),
}

impl BlockTag {
    fn to_value(self) -> Value {
        match self {
            BlockTag::Latest => "latest".into(),
            BlockTag::Earliest => "earliest".into(),
            BlockTag::Pending => "pending".into(),
            BlockTag::Number(number) => format!("{number:#x}").into(),
        }
    }
}

/// Arguments of `eth_call` and `eth_estimateGas`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallArgs {
    pub to: Option<String>,
    pub from: Option<String>,
    pub data: Option<String>,
    pub nonce: Option<Quantity>,
    pub value: Option<Quantity>,
    pub gas: Option<Quantity>,
    pub gas_price: Option<Quantity>,
    pub tag: BlockTag,
}

impl CallArgs {
    /// Builds the positional parameters `[call object, block tag]`.
    ///
    /// Addresses are lowercased, `from` falls back to [`ZERO_ADDRESS`],
    /// quantities are sent as minimal hex and empty or zero fields are left
    /// out.
    pub fn params(&self) -> Result<Vec<Value>, Error> {
        let mut object = Map::new();
        let address = |address: &Option<String>| {
            address
                .as_deref()
                .filter(|address| !address.is_empty())
                .map(str::to_lowercase)
        };

        if let Some(to) = address(&self.to) {
            object.insert("to".to_string(), to.into());
        }
        let from = address(&self.from).unwrap_or_else(|| ZERO_ADDRESS.to_string());
        object.insert("from".to_string(), from.into());
        if let Some(data) = self.data.as_ref().filter(|data| !data.is_empty()) {
            object.insert("data".to_string(), data.clone().into());
        }
        for (name, quantity) in [
            ("nonce", &self.nonce),
            ("value", &self.value),
            ("gas", &self.gas),
            ("gasPrice", &self.gas_price),
        ] {
            if let Some(quantity) = non_zero_quantity(quantity.as_ref())? {
                object.insert(name.to_string(), quantity.into());
            }
        }

        Ok(vec![Value::Object(object), self.tag.to_value()])
    }
}

fn non_zero_quantity(quantity: Option<&Quantity>) -> Result<Option<String>, Error> {
    let Some(quantity) = quantity else {
        return Ok(None);
    };
    let quantity = quantity.to_int()?;
    if quantity.is_zero() {
        return Ok(None);
    }
    Ok(Some(number::normalize_quantity(quantity)?))
}

/// A call the client knows how to encode.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    SimulateCall(CallArgs),
    EstimateGas(CallArgs),
    Raw { method: String, params: Vec<Value> },
}

impl Request {
    /// Method name and positional parameters on the wire.
    pub fn encode(&self) -> Result<(&str, Vec<Value>), Error> {
        Ok(match self {
            Request::SimulateCall(args) => ("eth_call", args.params()?),
            Request::EstimateGas(args) => ("eth_estimateGas", args.params()?),
            Request::Raw { method, params } => (method.as_str(), params.clone()),
        })
    }
}

/// Cheaply cloneable handle to a transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn RpcCall>,
}

impl Client {
    pub fn new(transport: impl RpcCall + 'static) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn RpcCall>) -> Self {
        Self { transport }
    }

    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        self.transport.call(method, params).await
    }

    pub async fn request(&self, request: &Request) -> Result<Value, Error> {
        let (method, params) = request.encode()?;
        self.call(method, params).await
    }

    /// Executes `eth_call` and returns the raw return data.
    pub async fn simulate_call(&self, args: &CallArgs) -> Result<String, Error> {
        match self.request(&Request::SimulateCall(args.clone())).await? {
            Value::String(data) => Ok(data),
            other => Err(number::Error::NotAString(hex::value_kind(&other)).into()),
        }
    }

    pub async fn estimate_gas(&self, args: &CallArgs) -> Result<BigUint, Error> {
        let gas = self
            .request(&Request::EstimateGas(args.clone()))
            .await?;
        Ok(hex::hex_value_to_int(&gas)?)
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish()
    }
}
