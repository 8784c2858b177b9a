use {
    crate::{
        Error,
        buffered,
        client::Client,
        etherscan::{self, EtherscanTransport},
        http::{HttpOptions, ReqwestClient},
        jsonrpc::{JsonRpcOptions, JsonRpcTransport},
    },
    std::{
        fmt::{self, Display, Formatter},
        num::{NonZeroUsize, ParseFloatError},
        sync::Arc,
        time::Duration,
    },
    url::Url,
};

/// Command line arguments for connecting to a node or the block explorer.
#[derive(clap::Parser)]
#[group(skip)]
pub struct Arguments {
    /// JSON RPC endpoint of the node. Takes precedence over the explorer
    /// when both are configured.
    #[clap(long, env)]
    pub node_url: Option<Url>,

    /// API key for the Etherscan REST API.
    #[clap(long, env)]
    pub etherscan_api_key: Option<String>,

    #[clap(long, env, default_value = etherscan::DEFAULT_URL)]
    pub etherscan_url: Url,

    /// Merge concurrently issued JSON RPC calls into batch requests.
    #[clap(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub ethrpc_batch: bool,

    /// Maximum number of calls in one batch request. Larger windows are sent
    /// as several consecutive batches. Unlimited when unset.
    #[clap(long, env)]
    pub ethrpc_max_batch_size: Option<NonZeroUsize>,

    /// Buffering "nagle" delay to wait for additional calls before sending
    /// out a batch.
    #[clap(long, env, value_parser = duration_from_seconds, default_value = "0")]
    pub ethrpc_batch_delay: Duration,

    /// Accept self signed TLS certificates.
    #[clap(long, env)]
    pub ethrpc_ssl_allow_self_signed: bool,

    /// Timeout for a single HTTP request. No timeout when unset.
    #[clap(long, env, value_parser = duration_from_seconds)]
    pub ethrpc_timeout: Option<Duration>,
}

impl Arguments {
    /// Returns the batching configuration or `None` if batching is disabled.
    fn batch_configuration(&self) -> Option<buffered::Configuration> {
        self.ethrpc_batch.then(|| buffered::Configuration {
            max_batch_len: self.ethrpc_max_batch_size,
            batch_delay: self.ethrpc_batch_delay,
        })
    }

    fn http_options(&self) -> HttpOptions {
        HttpOptions {
            ssl_allow_self_signed: self.ethrpc_ssl_allow_self_signed,
            timeout: self.ethrpc_timeout,
            ..Default::default()
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Self {
            node_url,
            etherscan_api_key,
            etherscan_url,
            ethrpc_batch,
            ethrpc_max_batch_size,
            ethrpc_batch_delay,
            ethrpc_ssl_allow_self_signed,
            ethrpc_timeout,
        } = self;

        display_option(f, "node_url", node_url)?;
        display_option(
            f,
            "etherscan_api_key",
            &etherscan_api_key.as_ref().map(|_| "SECRET"),
        )?;
        writeln!(f, "etherscan_url: {etherscan_url}")?;
        writeln!(f, "ethrpc_batch: {ethrpc_batch}")?;
        display_option(f, "ethrpc_max_batch_size", ethrpc_max_batch_size)?;
        writeln!(f, "ethrpc_batch_delay: {ethrpc_batch_delay:?}")?;
        writeln!(
            f,
            "ethrpc_ssl_allow_self_signed: {ethrpc_ssl_allow_self_signed}"
        )?;
        display_option(
            f,
            "ethrpc_timeout",
            &ethrpc_timeout.map(|timeout| format!("{timeout:?}")),
        )?;

        Ok(())
    }
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

pub fn duration_from_seconds(s: &str) -> Result<Duration, ParseFloatError> {
    Ok(Duration::from_secs_f32(s.parse()?))
}

/// Creates a client for the configured backend. A node URL selects the JSON
/// RPC transport, otherwise an API key selects the explorer.
pub fn client(args: &Arguments) -> Result<Client, Error> {
    let http = Arc::new(ReqwestClient::new(&args.http_options())?);

    if let Some(url) = &args.node_url {
        let options = JsonRpcOptions {
            batch: args.batch_configuration(),
            ..Default::default()
        };
        tracing::info!(%url, batching = options.batch.is_some(), "using json rpc node");
        return Ok(Client::new(JsonRpcTransport::new(url.clone(), http, options)?));
    }

    if let Some(api_key) = &args.etherscan_api_key {
        tracing::info!(url = %args.etherscan_url, "using etherscan");
        let transport =
            EtherscanTransport::new(api_key.clone(), http)?.with_base_url(args.etherscan_url.clone());
        return Ok(Client::new(transport));
    }

    Err(Error::Config(
        "either a node url or an etherscan api key is required".to_string(),
    ))
}
