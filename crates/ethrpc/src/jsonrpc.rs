//! JSON RPC 2.0 over HTTP with transparent batching.
//!
//! Every call gets an id from a per transport counter. With batching enabled
//! the call parks a oneshot sender in the `pending` table and pushes its
//! envelope onto the [`BatchQueue`]. The first push of a window schedules a
//! flush on the transport's serialization lock, so flushes of one transport
//! never overlap. Responses are routed back by id regardless of the order
//! the node answers in. Without batching every call sends its own envelope
//! and awaits the answer directly.

use {
    crate::{
        Error,
        RpcError,
        TransportError,
        buffered::{BatchQueue, Configuration},
        errors::render,
        http::HttpClient,
        lock::LockTable,
    },
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::{
        collections::HashMap,
        fmt::{self, Debug, Formatter},
        sync::{
            Arc,
            Mutex,
            atomic::{AtomicU64, AtomicUsize, Ordering},
        },
    },
    tokio::sync::oneshot,
    url::Url,
};

#[derive(Clone, Debug)]
pub struct JsonRpcOptions {
    /// `None` sends every call as its own request.
    pub batch: Option<Configuration>,
    /// Lock table the batch flushes are serialized on. Transports may share
    /// one table since every transport uses its own key.
    pub locks: LockTable,
}

impl Default for JsonRpcOptions {
    fn default() -> Self {
        Self {
            batch: Some(Configuration::default()),
            locks: LockTable::new(),
        }
    }
}

/// Outgoing call envelope.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Request {
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
    pub jsonrpc: &'static str,
}

impl Request {
    pub fn new(id: u64, method: &str, params: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            params,
            id,
            jsonrpc: "2.0",
        }
    }
}

/// One element of a (possibly batched) response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Response {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ErrorObject {
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Response {
    fn id(&self) -> Option<u64> {
        match &self.id {
            Value::Number(id) => id.as_u64(),
            Value::String(id) => id.parse().ok(),
            _ => None,
        }
    }

    /// Errors without a message are treated as absent.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.error {
            Some(error) if !error.message.is_empty() => {
                Err(RpcError::json_rpc(&error.code, error.message))
            }
            _ => Ok(self.result),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Payload {
    Single(Request),
    Batch(Vec<Request>),
}

impl Payload {
    fn ids(&self) -> Vec<u64> {
        match self {
            Payload::Single(request) => vec![request.id],
            Payload::Batch(requests) => requests.iter().map(|request| request.id).collect(),
        }
    }
}

type PendingCall = oneshot::Sender<Result<Response, TransportError>>;

#[derive(Clone)]
pub struct JsonRpcTransport {
    inner: Arc<Inner>,
}

struct Inner {
    url: Url,
    http: Arc<dyn HttpClient>,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingCall>>,
    batch: Option<BatchQueue<Request>>,
    locks: LockTable,
    lock_key: String,
}

impl JsonRpcTransport {
    pub fn new(
        url: Url,
        http: Arc<dyn HttpClient>,
        options: JsonRpcOptions,
    ) -> Result<Self, Error> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported protocol {:?} in node url",
                url.scheme()
            )));
        }

        static INSTANCES: AtomicUsize = AtomicUsize::new(0);
        let instance = INSTANCES.fetch_add(1, Ordering::Relaxed);

        Ok(Self {
            inner: Arc::new(Inner {
                url,
                http,
                next_id: AtomicU64::new(0),
                pending: Default::default(),
                batch: options.batch.map(BatchQueue::new),
                locks: options.locks,
                lock_key: format!("JsonRPC_batch{instance}"),
            }),
        })
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Calls `method` and returns the `result` member of the response, or
    /// `null` if the node sent none.
    pub async fn execute(&self, method: &str, params: Vec<Value>) -> Result<Value, Error> {
        let response = self.send_request(method, params).await?;
        Ok(response.into_result()?)
    }

    async fn send_request(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Response, TransportError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(id, method, params);
        tracing::trace!(%id, %method, "queueing call");

        let Some(queue) = &self.inner.batch else {
            return self.inner.send_single(request).await;
        };

        let (sender, receiver) = oneshot::channel();
        self.inner.pending.lock().unwrap().insert(id, sender);
        if queue.push(request) {
            // The window stays open until this task yields, so calls issued
            // alongside this one (e.g. through `join!`) share the batch. The
            // guard schedules the flush even if this call is dropped here.
            let flush = ScheduleFlush(self.inner.clone());
            tokio::task::yield_now().await;
            drop(flush);
        }

        receiver.await.map_err(|_| TransportError::Dropped)?
    }
}

/// Schedules the flush of the current batch window when dropped.
struct ScheduleFlush(Arc<Inner>);

impl Drop for ScheduleFlush {
    fn drop(&mut self) {
        if tokio::runtime::Handle::try_current().is_err() {
            return;
        }
        let inner = self.0.clone();
        // The flush delivers its results through the pending table, nobody
        // needs to await it.
        drop(
            self.0
                .locks
                .acquire(self.0.lock_key.clone(), move || inner.flush()),
        );
    }
}

impl Inner {
    async fn flush(self: Arc<Self>) {
        let Some(queue) = &self.batch else {
            return;
        };
        queue.close_window().await;
        for batch in queue.take() {
            tracing::debug!(size = batch.len(), lock = %self.lock_key, "sending batch");
            self.send_batch(batch).await;
        }
    }

    /// Sends one envelope and returns the response carrying its id.
    async fn send_single(&self, request: Request) -> Result<Response, TransportError> {
        let id = request.id;
        let elements = self
            .exchange(&Payload::Single(request))
            .await
            .inspect_err(|err| tracing::warn!(%id, %err, "rpc request failed"))?;

        let mut answer = None;
        for response in elements.into_iter().filter_map(decode_element) {
            if answer.is_none() && response.id() == Some(id) {
                answer = Some(response);
            } else {
                tracing::warn!(id = %render(&response.id), "response for unknown request");
            }
        }
        answer.ok_or_else(|| {
            tracing::warn!(%id, "node did not answer request");
            TransportError::MissingResponse(id)
        })
    }

    /// Sends a batch and resolves the pending calls it contains.
    async fn send_batch(&self, batch: Vec<Request>) {
        let payload = Payload::Batch(batch);
        let ids = payload.ids();
        match self.exchange(&payload).await {
            Ok(elements) => self.dispatch(&ids, elements),
            Err(err) => {
                tracing::warn!(?ids, %err, "rpc request failed");
                let mut pending = self.pending.lock().unwrap();
                for id in &ids {
                    if let Some(sender) = pending.remove(id) {
                        let _ = sender.send(Err(err.clone()));
                    }
                }
            }
        }
    }

    async fn exchange(&self, payload: &Payload) -> Result<Vec<Value>, TransportError> {
        let body = serde_json::to_string(payload)
            .map_err(|err| TransportError::Encode(err.to_string()))?;
        let text = self.http.post_json(&self.url, body).await?;
        parse_response(&text)
    }

    fn dispatch(&self, ids: &[u64], elements: Vec<Value>) {
        let mut pending = self.pending.lock().unwrap();
        for response in elements.into_iter().filter_map(decode_element) {
            let Some(sender) = response.id().and_then(|id| pending.remove(&id)) else {
                tracing::warn!(id = %render(&response.id), "response for unknown request");
                continue;
            };
            let _ = sender.send(Ok(response));
        }

        for id in ids {
            if let Some(sender) = pending.remove(id) {
                tracing::warn!(%id, "node did not answer request");
                let _ = sender.send(Err(TransportError::MissingResponse(*id)));
            }
        }
    }
}

fn decode_element(element: Value) -> Option<Response> {
    serde_json::from_value(element)
        .inspect_err(|err| tracing::warn!(%err, "ignoring malformed response element"))
        .ok()
}

impl Debug for JsonRpcTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRpcTransport")
            .field("url", &self.inner.url.as_str())
            .field("batching", &self.inner.batch.is_some())
            .field("lock_key", &self.inner.lock_key)
            .finish()
    }
}

/// Decodes a response body into its elements. Single responses become a one
/// element list.
fn parse_response(body: &str) -> Result<Vec<Value>, TransportError> {
    let parsed = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        // Some nodes (e.g. Erigon) stream batch responses as one JSON document
        // per line.
        Err(_) => body
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<Value>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                TransportError::InvalidResponse(format!("{err}, raw response: {}", body.trim()))
            })?
            .into_iter()
            .flat_map(|value| match value {
                Value::Array(elements) => elements,
                element => vec![element],
            })
            .collect(),
    };

    Ok(match parsed {
        Value::Array(elements) => elements,
        element => vec![element],
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::http::MockHttpClient,
        futures::FutureExt,
        serde_json::json,
        std::{num::NonZeroUsize, time::Duration},
        tokio::sync::Semaphore,
    };

    fn url() -> Url {
        "http://localhost:8545".parse().unwrap()
    }

    fn transport(http: impl HttpClient + 'static) -> JsonRpcTransport {
        JsonRpcTransport::new(url(), Arc::new(http), Default::default()).unwrap()
    }

    fn pending_calls(transport: &JsonRpcTransport) -> usize {
        transport.inner.pending.lock().unwrap().len()
    }

    /// Answers every request with its own method name, optionally holding
    /// each request until the test hands out a permit.
    #[derive(Default)]
    struct EchoNode {
        bodies: Mutex<Vec<Value>>,
        gate: Option<Semaphore>,
    }

    #[async_trait::async_trait]
    impl HttpClient for EchoNode {
        async fn post_json(&self, _: &Url, body: String) -> Result<String, TransportError> {
            let body: Value = serde_json::from_str(&body).unwrap();
            self.bodies.lock().unwrap().push(body.clone());
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }

            let echo = |request: &Value| {
                json!({ "jsonrpc": "2.0", "id": request["id"], "result": request["method"] })
            };
            let response = match &body {
                Value::Array(requests) => Value::Array(requests.iter().map(echo).collect()),
                request => echo(request),
            };
            Ok(response.to_string())
        }

        async fn get(&self, _: &Url) -> Result<String, TransportError> {
            unreachable!()
        }
    }

    #[test]
    fn serializes_request_envelope() {
        let request = Request::new(7, "eth_getBalance", vec![json!("0xabc"), json!("latest")]);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"method":"eth_getBalance","params":["0xabc","latest"],"id":7,"jsonrpc":"2.0"}"#
        );
    }

    #[test]
    fn parses_single_batch_and_line_delimited_responses() {
        assert_eq!(
            parse_response(r#"{"id":1,"result":"0x1"}"#).unwrap(),
            vec![json!({"id": 1, "result": "0x1"})]
        );
        assert_eq!(
            parse_response(r#"[{"id":1,"result":"0x1"},{"id":2,"result":"0x2"}]"#).unwrap(),
            vec![json!({"id": 1, "result": "0x1"}), json!({"id": 2, "result": "0x2"})]
        );
        assert_eq!(
            parse_response("{\"id\":1,\"result\":\"0x1\"}\n\n[{\"id\":2,\"result\":\"0x2\"}]\n")
                .unwrap(),
            vec![json!({"id": 1, "result": "0x1"}), json!({"id": 2, "result": "0x2"})]
        );
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(TransportError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_without_message_is_ignored() {
        let response = Response {
            result: json!("0x1"),
            error: Some(ErrorObject {
                code: json!(-32000),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(response.into_result(), Ok(json!("0x1")));
    }

    #[test]
    fn rejects_non_http_urls() {
        let result = JsonRpcTransport::new(
            "ws://localhost:8546".parse().unwrap(),
            Arc::new(MockHttpClient::new()),
            Default::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn batches_concurrent_calls_into_one_request() {
        let mut http = MockHttpClient::new();
        http.expect_post_json()
            .times(1)
            .withf(|url, body| {
                let body: Value = serde_json::from_str(body).unwrap();
                url.as_str() == "http://localhost:8545/"
                    && body
                        == json!([
                            { "method": "eth_blockNumber", "params": [], "id": 0, "jsonrpc": "2.0" },
                            { "method": "eth_gasPrice", "params": [], "id": 1, "jsonrpc": "2.0" },
                            { "method": "eth_chainId", "params": [], "id": 2, "jsonrpc": "2.0" },
                        ])
            })
            // answered out of order
            .returning(|_, _| {
                Ok(json!([
                    { "jsonrpc": "2.0", "id": 2, "result": "0x1" },
                    { "jsonrpc": "2.0", "id": 0, "result": "0x10" },
                    { "jsonrpc": "2.0", "id": 1, "result": "0x3b9aca00" },
                ])
                .to_string())
            });
        let transport = transport(http);

        let (block, gas_price, chain) = tokio::join!(
            transport.execute("eth_blockNumber", vec![]),
            transport.execute("eth_gasPrice", vec![]),
            transport.execute("eth_chainId", vec![]),
        );

        assert_eq!(block.unwrap(), json!("0x10"));
        assert_eq!(gas_price.unwrap(), json!("0x3b9aca00"));
        assert_eq!(chain.unwrap(), json!("0x1"));
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test]
    async fn transport_failure_fails_every_call_of_the_batch() {
        let mut http = MockHttpClient::new();
        http.expect_post_json()
            .times(1)
            .returning(|_, _| Err(TransportError::Http("connection refused".to_string())));
        let transport = transport(http);

        let (a, b) = tokio::join!(
            transport.execute("eth_blockNumber", vec![]),
            transport.execute("eth_gasPrice", vec![]),
        );

        for result in [a, b] {
            assert!(matches!(
                result,
                Err(Error::Transport(TransportError::Http(message))) if message == "connection refused"
            ));
        }
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test]
    async fn rpc_errors_only_fail_their_own_call() {
        let mut http = MockHttpClient::new();
        http.expect_post_json().returning(|_, _| {
            Ok(json!([
                { "jsonrpc": "2.0", "id": 0, "error": { "code": -32000, "message": "execution reverted" } },
                { "jsonrpc": "2.0", "id": 1, "result": "0x" },
            ])
            .to_string())
        });
        let transport = transport(http);

        let (call, code) = tokio::join!(
            transport.execute("eth_call", vec![json!({}), json!("latest")]),
            transport.execute("eth_getCode", vec![json!("0x0"), json!("latest")]),
        );

        let err = call.unwrap_err();
        assert_eq!(err.to_string(), "JsonRPC(-32000): execution reverted");
        assert!(matches!(err, Error::Rpc(RpcError { ref code, .. }) if code == "-32000"));
        assert_eq!(code.unwrap(), json!("0x"));
    }

    #[tokio::test]
    async fn missing_result_is_null() {
        let mut http = MockHttpClient::new();
        http.expect_post_json()
            .returning(|_, _| Ok(r#"{"jsonrpc":"2.0","id":0}"#.to_string()));
        let transport = transport(http);

        assert_eq!(
            transport.execute("eth_blockNumber", vec![]).await.unwrap(),
            Value::Null
        );
    }

    #[tokio::test]
    async fn unanswered_calls_fail_instead_of_hanging() {
        let mut http = MockHttpClient::new();
        http.expect_post_json().returning(|_, _| {
            Ok(json!([
                { "jsonrpc": "2.0", "id": 0, "result": "0x1" },
                { "jsonrpc": "2.0", "id": 99, "result": "0x2" },
            ])
            .to_string())
        });
        let transport = transport(http);

        let (answered, unanswered) = tokio::join!(
            transport.execute("eth_blockNumber", vec![]),
            transport.execute("eth_gasPrice", vec![]),
        );

        assert_eq!(answered.unwrap(), json!("0x1"));
        assert!(matches!(
            unanswered,
            Err(Error::Transport(TransportError::MissingResponse(1)))
        ));
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test]
    async fn unbatched_transport_sends_single_envelopes() {
        let node = Arc::new(EchoNode::default());
        let transport = JsonRpcTransport::new(
            url(),
            node.clone(),
            JsonRpcOptions {
                batch: None,
                ..Default::default()
            },
        )
        .unwrap();

        let (a, b) = tokio::join!(
            transport.execute("eth_blockNumber", vec![]),
            transport.execute("eth_gasPrice", vec![]),
        );

        assert_eq!(a.unwrap(), json!("eth_blockNumber"));
        assert_eq!(b.unwrap(), json!("eth_gasPrice"));
        let bodies = node.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert!(bodies.iter().all(Value::is_object));
    }

    #[tokio::test]
    async fn large_windows_are_split_when_capped() {
        let node = Arc::new(EchoNode::default());
        let transport = JsonRpcTransport::new(
            url(),
            node.clone(),
            JsonRpcOptions {
                batch: Some(Configuration {
                    max_batch_len: NonZeroUsize::new(2),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .unwrap();

        issue_calls(&transport, 5).await;

        assert_eq!(batch_sizes(&node), vec![2, 2, 1]);
    }

    async fn issue_calls(transport: &JsonRpcTransport, count: usize) {
        let calls = (0..count).map(|i| async move {
            let result = transport.execute(&format!("method_{i}"), vec![]).await;
            assert_eq!(result.unwrap(), json!(format!("method_{i}")));
        });
        futures::future::join_all(calls).await;
    }

    fn batch_sizes(node: &EchoNode) -> Vec<usize> {
        node.bodies
            .lock()
            .unwrap()
            .iter()
            .map(|body| body.as_array().unwrap().len())
            .collect()
    }

    #[tokio::test]
    async fn windows_are_sent_whole_by_default() {
        let node = Arc::new(EchoNode::default());
        let transport = JsonRpcTransport::new(url(), node.clone(), Default::default()).unwrap();

        issue_calls(&transport, 150).await;

        assert_eq!(batch_sizes(&node), vec![150]);
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn calls_issued_together_share_a_batch_on_worker_threads() {
        for _ in 0..100 {
            let node = Arc::new(EchoNode::default());
            let transport =
                JsonRpcTransport::new(url(), node.clone(), Default::default()).unwrap();

            issue_calls(&transport, 50).await;

            assert_eq!(batch_sizes(&node), vec![50]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn spawned_callers_are_all_answered_on_worker_threads() {
        let node = Arc::new(EchoNode::default());
        let transport = JsonRpcTransport::new(url(), node.clone(), Default::default()).unwrap();

        let callers: Vec<_> = (0..8)
            .map(|_| {
                let transport = transport.clone();
                tokio::spawn(async move { issue_calls(&transport, 25).await })
            })
            .collect();
        for caller in callers {
            caller.await.unwrap();
        }

        assert_eq!(batch_sizes(&node).iter().sum::<usize>(), 200);
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test]
    async fn dropped_caller_still_flushes_its_window() {
        let node = Arc::new(EchoNode::default());
        let transport = JsonRpcTransport::new(url(), node.clone(), Default::default()).unwrap();

        // polled once, then dropped while it holds the window open
        let dropped = transport.execute("eth_blockNumber", vec![]).now_or_never();
        assert!(dropped.is_none());

        assert_eq!(
            transport.execute("eth_gasPrice", vec![]).await.unwrap(),
            json!("eth_gasPrice")
        );
        assert_eq!(batch_sizes(&node), vec![2]);
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_unbatched_calls_leave_nothing_behind() {
        struct SilentNode;

        #[async_trait::async_trait]
        impl HttpClient for SilentNode {
            async fn post_json(&self, _: &Url, _: String) -> Result<String, TransportError> {
                std::future::pending().await
            }

            async fn get(&self, _: &Url) -> Result<String, TransportError> {
                unreachable!()
            }
        }

        let transport = JsonRpcTransport::new(
            url(),
            Arc::new(SilentNode),
            JsonRpcOptions {
                batch: None,
                ..Default::default()
            },
        )
        .unwrap();

        for _ in 0..10 {
            let call = transport.execute("eth_blockNumber", vec![]);
            let result = tokio::time::timeout(Duration::from_millis(1), call).await;
            assert!(result.is_err());
        }
        assert_eq!(pending_calls(&transport), 0);
    }

    #[tokio::test]
    async fn calls_issued_while_a_batch_is_in_flight_go_into_the_next_one() {
        let node = Arc::new(EchoNode {
            gate: Some(Semaphore::new(0)),
            ..Default::default()
        });
        let transport = JsonRpcTransport::new(url(), node.clone(), Default::default()).unwrap();

        let first = tokio::spawn({
            let transport = transport.clone();
            async move {
                tokio::join!(
                    transport.execute("eth_blockNumber", vec![]),
                    transport.execute("eth_gasPrice", vec![]),
                )
            }
        });
        while node.bodies.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }

        let second = tokio::spawn({
            let transport = transport.clone();
            async move { transport.execute("eth_chainId", vec![]).await }
        });
        node.gate.as_ref().unwrap().add_permits(2);

        let (a, b) = first.await.unwrap();
        assert_eq!(a.unwrap(), json!("eth_blockNumber"));
        assert_eq!(b.unwrap(), json!("eth_gasPrice"));
        assert_eq!(second.await.unwrap().unwrap(), json!("eth_chainId"));

        let bodies = node.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].as_array().unwrap().len(), 2);
        assert_eq!(bodies[1].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn forwards_the_request_id_of_the_first_caller() {
        #[derive(Default)]
        struct RecordingNode(Mutex<Vec<Option<String>>>);

        #[async_trait::async_trait]
        impl HttpClient for RecordingNode {
            async fn post_json(&self, _: &Url, _: String) -> Result<String, TransportError> {
                self.0.lock().unwrap().push(observe::request_id::current());
                Ok(r#"{"jsonrpc":"2.0","id":0,"result":"0x1"}"#.to_string())
            }

            async fn get(&self, _: &Url) -> Result<String, TransportError> {
                unreachable!()
            }
        }

        let node = Arc::new(RecordingNode::default());
        let transport = JsonRpcTransport::new(url(), node.clone(), Default::default()).unwrap();

        observe::request_id::scoped(
            "order-42".to_string(),
            transport.execute("eth_blockNumber", vec![]),
        )
        .await
        .unwrap();

        assert_eq!(*node.0.lock().unwrap(), vec![Some("order-42".to_string())]);
    }
}
