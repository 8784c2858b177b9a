//! Answers a subset of the RPC methods through the Etherscan REST API.
//!
//! Every supported method maps to one `GET` request whose query carries the
//! explorer module, the action and the call parameters by name. Methods
//! without a mapping are rejected before any I/O happens.

use {
    crate::{
        Error,
        RpcError,
        TransportError,
        errors::render,
        http::HttpClient,
        jsonrpc::ErrorObject,
    },
    serde::Deserialize,
    serde_json::Value,
    std::{
        fmt::{self, Debug, Formatter},
        sync::Arc,
    },
    url::Url,
};

pub const DEFAULT_URL: &str = "https://api.etherscan.io/api";
const SEARCH_URL: &str = "https://etherscan.io/searchHandler";

/// Query parameter names for the positional parameters of each method.
const METHOD_PARAMS: &[(&str, &[&str])] = &[
    ("eth_blockNumber", &[]),
    ("eth_gasPrice", &[]),
    ("eth_getBlockByNumber", &["tag", "boolean"]),
    ("eth_getBlockTransactionCountByNumber", &["tag"]),
    ("eth_getTransactionByHash", &["txhash"]),
    ("eth_getTransactionReceipt", &["txhash"]),
    ("eth_sendRawTransaction", &["hex"]),
    ("eth_getBalance", &["address", "tag"]),
    ("eth_getTransactionCount", &["address", "tag"]),
    ("eth_getCode", &["address", "tag"]),
    ("eth_getStorageAt", &["address", "position", "tag"]),
    ("account_txlist", &["address", "startblock", "page"]),
    ("account_txlistinternal", &["address", "startblock"]),
    ("account_tokentx", &["address", "startblock"]),
];

/// Methods taking a call object and a block tag.
const CALL_METHODS: &[&str] = &["eth_call", "eth_estimateGas"];

/// Pseudo methods with this prefix address the `account` module.
const ACCOUNT_PREFIX: &str = "account_";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub module: &'static str,
    pub action: String,
    pub params: Vec<(String, String)>,
}

/// Translates an RPC call into the explorer query answering it.
pub fn build_query(method: &str, params: &[Value]) -> Result<Query, Error> {
    let positional = METHOD_PARAMS.iter().find(|(name, _)| *name == method);
    let params = if let Some((_, names)) = positional {
        // surplus positional parameters are dropped
        names
            .iter()
            .zip(params)
            .map(|(name, value)| (name.to_string(), render(value)))
            .collect()
    } else if CALL_METHODS.iter().any(|name| *name == method) {
        let mut pairs: Vec<_> = match params.first() {
            Some(Value::Object(fields)) => fields
                .iter()
                .filter(|(_, value)| is_set(value))
                .map(|(name, value)| (name.clone(), render(value)))
                .collect(),
            _ => Vec::new(),
        };
        if let Some(tag) = params.get(1).filter(|tag| is_set(tag)) {
            pairs.push(("tag".to_string(), render(tag)));
        }
        pairs
    } else {
        return Err(Error::UnsupportedMethod(method.to_string()));
    };

    let (module, action) = if method == "eth_getBalance" {
        ("account", "balance")
    } else if let Some(action) = method.strip_prefix(ACCOUNT_PREFIX) {
        ("account", action)
    } else {
        ("proxy", method)
    };

    Ok(Query {
        module,
        action: action.to_string(),
        params,
    })
}

/// Whether a call object field carries a value worth sending.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<ErrorObject>,
}

impl Envelope {
    fn into_result(self) -> Result<Value, RpcError> {
        if self.message.as_deref() == Some("NOTOK") {
            return Err(RpcError::etherscan(&self.status, render(&self.result)));
        }
        match self.error {
            Some(error) if !error.message.is_empty() => {
                Err(RpcError::etherscan(&error.code, error.message))
            }
            _ => Ok(self.result),
        }
    }
}

#[derive(Clone)]
pub struct EtherscanTransport {
    http: Arc<dyn HttpClient>,
    base_url: Url,
    search_url: Url,
    api_key: String,
}

impl EtherscanTransport {
    pub fn new(api_key: impl Into<String>, http: Arc<dyn HttpClient>) -> Result<Self, Error> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config("etherscan api key is empty".to_string()));
        }
        Ok(Self {
            http,
            base_url: parse_static(DEFAULT_URL)?,
            search_url: parse_static(SEARCH_URL)?,
            api_key,
        })
    }

    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = url;
        self
    }

    pub fn with_search_url(mut self, url: Url) -> Self {
        self.search_url = url;
        self
    }

    fn format_url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("module", query.module)
                .append_pair("action", &query.action);
            for (name, value) in &query.params {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("apikey", &self.api_key);
        }
        url
    }

    pub async fn execute(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        let query = build_query(method, &params)?;
        let url = self.format_url(&query);
        tracing::debug!(module = query.module, action = %query.action, "querying etherscan");

        let body = self.http.get(&url).await?;
        let envelope: Envelope = serde_json::from_str(&body).map_err(|err| {
            TransportError::InvalidResponse(format!("{err}, raw response: {}", body.trim()))
        })?;
        Ok(envelope.into_result()?)
    }

    /// Addresses and names the explorer's search box suggests for the given
    /// prefix.
    pub async fn autocomplete(&self, term: &str) -> Result<Vec<String>, Error> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("filterby", "0");

        let body = self.http.get(&url).await?;
        let rows: Vec<String> = serde_json::from_str(&body).map_err(|err| {
            TransportError::InvalidResponse(format!("{err}, raw response: {}", body.trim()))
        })?;
        // Rows are tab separated with the suggestion first. The first row
        // only echoes the search term.
        Ok(rows
            .iter()
            .skip(1)
            .map(|row| row.split('\t').next().unwrap_or_default().to_string())
            .collect())
    }
}

fn parse_static(url: &str) -> Result<Url, Error> {
    url.parse::<Url>()
        .map_err(|err| Error::Config(format!("invalid url {url}: {err}")))
}

impl Debug for EtherscanTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtherscanTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"SECRET")
            .finish()
    }
}
