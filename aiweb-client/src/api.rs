use aiweb_types::{
    ChatRequest, ChatResponse, EchoPayload, EchoResponse, ErrorBody, HealthResponse,
    LessonRequest, LessonResponse, Message,
};
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::retry::{RetryPolicy, with_retry};

/// Typed access to the aiweb backend.
///
/// Only [`Api::flaky_echo`] goes through the retry wrapper; every other call
/// is attempted once and its failure is returned as-is.
///
/// # Example
/// ```rust,no_run
/// # async fn run() -> Result<(), aiweb_client::ClientError> {
/// use aiweb_client::{Api, ClientConfig};
/// let api = Api::new(ClientConfig::from_env()?);
/// let reply = api.send_chat("Hello", &[]).await?;
/// println!("{}", reply.content);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Api {
    config: ClientConfig,
    retry: RetryPolicy,
    client: Client,
}

impl Api {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("aiweb-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            config,
            retry: RetryPolicy::default(),
            client,
        }
    }

    /// Resolve the API base from the environment (see [`ClientConfig::from_env`]).
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Set the policy used by [`Api::flaky_echo`] (default: 2 retries, 400 ms apart).
    pub fn set_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.config.endpoint("/health")?;
        let resp = self.client.get(url).send().await?;
        decode(resp).await
    }

    /// `POST /echo`
    pub async fn echo(&self, msg: &str) -> Result<EchoResponse, ClientError> {
        let url = self.config.endpoint("/echo")?;
        self.post_json(url, &EchoPayload { msg: msg.to_owned() }).await
    }

    /// `POST /echo?failures=N`, retried according to the configured policy.
    ///
    /// The server fails the first `failures` calls from this host. When every
    /// attempt fails the caller gets [`ClientError::Transient`]; the individual
    /// causes are not distinguished.
    pub async fn flaky_echo(&self, msg: &str, failures: u32) -> Result<EchoResponse, ClientError> {
        let mut url = self.config.endpoint("/echo")?;
        url.query_pairs_mut()
            .append_pair("failures", &failures.to_string());
        let payload = &EchoPayload { msg: msg.to_owned() };

        with_retry(self.retry, move || self.post_json::<_, EchoResponse>(url.clone(), payload))
            .await
            .map_err(|last| ClientError::Transient { last: Box::new(last) })
    }

    /// `POST /ai/lesson-outline`
    pub async fn lesson_outline(&self, topic: &str) -> Result<LessonResponse, ClientError> {
        let url = self.config.endpoint("/ai/lesson-outline")?;
        self.post_json(url, &LessonRequest { topic: topic.to_owned() }).await
    }

    /// `POST /ai/lesson-summary`
    pub async fn lesson_summary(&self, topic: &str) -> Result<LessonResponse, ClientError> {
        let url = self.config.endpoint("/ai/lesson-summary")?;
        self.post_json(url, &LessonRequest { topic: topic.to_owned() }).await
    }

    /// `POST /chat/message` with the full prior `history`, oldest first.
    pub async fn send_chat(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<ChatResponse, ClientError> {
        let url = self.config.endpoint("/chat/message")?;
        let req = ChatRequest {
            message: message.to_owned(),
            history: history.to_vec(),
        };
        self.post_json(url, &req).await
    }

    async fn post_json<B, R>(&self, url: Url, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%url, "POST");
        let resp = self.client.post(url).json(body).send().await?;
        decode(resp).await
    }
}

/// Deserialize a 2xx body, or turn the `{"error": ...}` body of any other
/// status into [`ClientError::Api`].
async fn decode<R: DeserializeOwned>(resp: Response) -> Result<R, ClientError> {
    let status = resp.status();
    if status.is_success() {
        let bytes = resp.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text.trim().to_owned(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use aiweb_types::{
        ChatRequest, ChatResponse, EchoPayload, EchoResponse, ErrorBody, LessonRequest,
        LessonResponse,
    };
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    use crate::config::ClientConfig;

    use super::Api;

    /// Counts requests that reached `/echo`.
    #[derive(Clone, Default)]
    pub struct Hits(pub Arc<AtomicU32>);

    impl Hits {
        pub fn get(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }

    type Rejected = (StatusCode, Json<ErrorBody>);

    fn rejected(status: StatusCode, msg: &str) -> Rejected {
        (status, Json(ErrorBody { error: msg.to_owned() }))
    }

    async fn echo(
        State(hits): State<Hits>,
        Query(params): Query<HashMap<String, u32>>,
        Json(payload): Json<EchoPayload>,
    ) -> Result<Json<EchoResponse>, Rejected> {
        let seen = hits.0.fetch_add(1, Ordering::SeqCst);
        match params.get("failures").copied() {
            None => Ok(Json(EchoResponse { msg: payload.msg, attempts: None })),
            Some(failures) if seen < failures => Err(rejected(
                StatusCode::SERVICE_UNAVAILABLE,
                "Simulated transient failure",
            )),
            Some(_) => Ok(Json(EchoResponse { msg: payload.msg, attempts: Some(seen + 1) })),
        }
    }

    async fn outline(Json(req): Json<LessonRequest>) -> Result<Json<LessonResponse>, Rejected> {
        if req.topic.trim().is_empty() {
            return Err(rejected(StatusCode::UNPROCESSABLE_ENTITY, "Topic must not be empty."));
        }
        Ok(Json(LessonResponse {
            topic: req.topic.trim().to_owned(),
            outline: vec!["Intro".into(), "Body".into(), "Conclusion".into()],
        }))
    }

    /// Replies with a summary of what it received so tests can check the
    /// request shape.
    async fn chat(Json(req): Json<ChatRequest>) -> Result<Json<ChatResponse>, Rejected> {
        if req.message == "fail" {
            return Err(rejected(
                StatusCode::SERVICE_UNAVAILABLE,
                "Failed to generate chatbot response: provider returned an error.",
            ));
        }
        let roles: Vec<&str> = req.history.iter().map(|m| m.role.as_str()).collect();
        Ok(Json(ChatResponse::assistant(format!(
            "{} [{}]",
            req.message,
            roles.join(",")
        ))))
    }

    /// Serve the fake backend on an ephemeral port and point an [`Api`] at it.
    pub async fn spawn() -> (Api, Hits) {
        let hits = Hits::default();
        let app = Router::new()
            .route("/echo", post(echo))
            .route("/ai/lesson-outline", post(outline))
            .route("/chat/message", post(chat))
            .route("/health", get(|| async { "ok" }))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = Api::new(ClientConfig::new(&format!("http://{addr}")).unwrap());
        (api, hits)
    }
}
