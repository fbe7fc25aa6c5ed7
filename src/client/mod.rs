use std::{path::PathBuf, sync::Arc, time::Duration};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::mpsc, time::Instant};
use tracing::{debug, warn};

use crate::{
    normalize::{self, ExploreResult, PlaylistEntry, TimelineEntry},
    protocol::{DiscoverRequest, Endpoint, Envelope, ExploreRequest, Flavor, TraceRequest},
};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub flavor: Flavor,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
    },
    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: Endpoint, message: String },
    #[error("{endpoint} sent an undecodable body: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

/// One user action, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Explore(ExploreRequest),
    Discover(DiscoverRequest),
    Trace(TraceRequest),
}

#[derive(Debug)]
pub enum Outcome {
    Explore(Result<ExploreResult, ApiError>),
    Discover(Result<Vec<PlaylistEntry>, ApiError>),
    Trace(Result<Vec<TimelineEntry>, ApiError>),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    flavor: Flavor,
    dump: Option<Arc<ResponseLogger>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, dump: Option<Arc<ResponseLogger>>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            flavor: config.flavor,
            dump,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub async fn execute(&self, request: Request) -> Outcome {
        match request {
            Request::Explore(request) => Outcome::Explore(self.explore(&request).await),
            Request::Discover(request) => Outcome::Discover(self.discover(&request).await),
            Request::Trace(request) => Outcome::Trace(self.trace(&request).await),
        }
    }

    pub async fn explore(&self, request: &ExploreRequest) -> Result<ExploreResult, ApiError> {
        match self.flavor {
            Flavor::Unified => {
                let envelope = self.call(Endpoint::Explore, request).await?;
                Ok(normalize::explore(&envelope.payload(&["data"]), request))
            }
            Flavor::Legacy => {
                let (why_watch, recs) = tokio::try_join!(
                    self.call(Endpoint::WhyWatch, request),
                    self.call(Endpoint::Recs, request),
                )?;
                Ok(normalize::explore_legacy(
                    &why_watch.payload(&["data"]),
                    &recs.payload(&["data"]),
                    request,
                ))
            }
        }
    }

    pub async fn discover(
        &self,
        request: &DiscoverRequest,
    ) -> Result<Vec<PlaylistEntry>, ApiError> {
        let envelope = match self.flavor {
            Flavor::Unified => self.call(Endpoint::Discover, request).await?,
            Flavor::Legacy => self.call(Endpoint::Playlist, &request.legacy()).await?,
        };

        Ok(normalize::playlist(&Value::Object(envelope.body)))
    }

    pub async fn trace(&self, request: &TraceRequest) -> Result<Vec<TimelineEntry>, ApiError> {
        let endpoint = match self.flavor {
            Flavor::Unified => Endpoint::Trace,
            Flavor::Legacy => Endpoint::Timeline,
        };
        let envelope = self.call(endpoint, request).await?;

        Ok(normalize::timeline(&Value::Object(envelope.body)))
    }

    async fn call<B>(&self, endpoint: Endpoint, body: &B) -> Result<Envelope, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.api_base, endpoint.path());
        let started = Instant::now();

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if let Some(dump) = &self.dump {
            dump.log(endpoint, status.as_u16(), text.clone());
        }

        debug!(
            %endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api call finished"
        );

        if !status.is_success() {
            return Err(ApiError::Status { endpoint, status });
        }

        let envelope: Envelope = serde_json::from_str(&text)
            .map_err(|source| ApiError::Decode { endpoint, source })?;

        if envelope.is_rejected() {
            return Err(ApiError::Rejected {
                endpoint,
                message: envelope.rejection_message(),
            });
        }

        Ok(envelope)
    }
}

#[derive(Debug)]
struct DumpRecord {
    endpoint: Endpoint,
    status: u16,
    body: String,
}

/// Appends every raw response body to a file for offline inspection.
#[derive(Debug)]
pub struct ResponseLogger {
    sender: mpsc::UnboundedSender<DumpRecord>,
}

impl ResponseLogger {
    pub fn new(path: PathBuf) -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<DumpRecord>();

        tokio::spawn(async move {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    while let Some(record) = rx.recv().await {
                        let line = format!(
                            "{} {} {}\n",
                            record.endpoint, record.status, record.body
                        );
                        if let Err(err) = file.write_all(line.as_bytes()).await {
                            warn!(?err, "failed to write response dump");
                            break;
                        }
                    }
                }
                Err(err) => {
                    warn!(?err, path = %path.display(), "failed to open response dump file");
                    while rx.recv().await.is_some() {}
                }
            }
        });

        Arc::new(Self { sender: tx })
    }

    fn log(&self, endpoint: Endpoint, status: u16, body: String) {
        let _ = self.sender.send(DumpRecord {
            endpoint,
            status,
            body,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        normalize::PLACEHOLDER_THUMBNAIL,
        server::{self, ServerConfig},
    };
    use axum::{Router, http::StatusCode, routing::post};
    use serde_json::json;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    async fn mock_client(flavor: Flavor) -> (ApiClient, server::ServerHandle) {
        let handle = server::spawn(ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            delay: Duration::ZERO,
        })
        .await
        .expect("mock server should start");

        let client = ApiClient::new(
            ClientConfig {
                api_base: format!("http://{}", handle.addr()),
                flavor,
                timeout: Some(Duration::from_secs(5)),
            },
            None,
        )
        .expect("client should build");

        (client, handle)
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router.into_make_service()).await;
        });
        format!("http://{}", addr)
    }

    fn client_for(api_base: String) -> ApiClient {
        ApiClient::new(
            ClientConfig {
                api_base,
                flavor: Flavor::Unified,
                timeout: Some(Duration::from_secs(5)),
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn trace_returns_four_talks_in_order() {
        let (client, handle) = mock_client(Flavor::Unified).await;

        let timeline = client
            .trace(&TraceRequest::from_input("Artificial Intelligence"))
            .await
            .expect("trace should succeed");

        assert_eq!(timeline.len(), 4);
        assert!(timeline.windows(2).all(|pair| pair[0].sort_key <= pair[1].sort_key));
        assert_eq!(timeline[0].talk.title, "Machines That Think");
        assert_eq!(timeline[0].display_date, "June 15, 2015");
        assert_eq!(timeline[3].talk.title, "The Future of Human-AI Collaboration");

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn legacy_timeline_uses_calendar_fields() {
        let (client, handle) = mock_client(Flavor::Legacy).await;

        let timeline = client
            .trace(&TraceRequest::from_input("Artificial Intelligence"))
            .await
            .expect("legacy timeline should succeed");

        let dates: Vec<&str> = timeline.iter().map(|e| e.display_date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["June 15, 2015", "March 22, 2017", "November 8, 2019", "September 12, 2021"]
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn explore_unified_and_legacy_agree_on_shape() {
        let request = ExploreRequest::from_input("https://ted.com/talks/the_future_of_innovation");

        let (unified, unified_handle) = mock_client(Flavor::Unified).await;
        let (legacy, legacy_handle) = mock_client(Flavor::Legacy).await;

        for client in [&unified, &legacy] {
            let result = client.explore(&request).await.expect("explore should succeed");
            let talk = result.talk.expect("featured talk expected");
            assert_eq!(talk.url, "https://ted.com/talks/the_future_of_innovation");
            assert!(!result.insight.is_empty());

            let categories: Vec<&str> = result
                .recommendations
                .iter()
                .map(|group| group.category.as_str())
                .collect();
            assert_eq!(
                categories,
                vec!["Psychology & Personal Growth", "Leadership & Innovation"]
            );
        }

        unified_handle.shutdown().await.unwrap();
        legacy_handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn discover_returns_tagged_playlist() {
        let (client, handle) = mock_client(Flavor::Unified).await;

        let request = DiscoverRequest::new(
            &["Curious"],
            &["Commuting"],
            &["Curious", "Commuting"],
            "",
        );
        let playlist = client.discover(&request).await.expect("discover should succeed");

        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist[0].talk.title, "The Puzzle of Motivation");
        assert_eq!(playlist[0].tags, vec!["motivation", "psychology", "work"]);
        assert!(playlist.iter().all(|entry| entry.talk.thumbnail == PLACEHOLDER_THUMBNAIL));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn legacy_discover_posts_combined_mood() {
        let (client, handle) = mock_client(Flavor::Legacy).await;

        let request = DiscoverRequest::new(
            &["Curious"],
            &["Commuting"],
            &["Curious", "Commuting"],
            "",
        );
        let playlist = client
            .discover(&request)
            .await
            .expect("legacy playlist should succeed");

        let titles: Vec<&str> = playlist.iter().map(|entry| entry.talk.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "The Puzzle of Motivation",
                "How to Make Stress Your Friend",
                "The Happy Secret to Better Work"
            ]
        );
        assert_eq!(playlist[1].tags, vec!["health", "psychology", "stress"]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn response_logger_appends_raw_bodies() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("responses.log");

        let router = Router::new().route(
            "/api/trace",
            post(|| async { axum::Json(json!({ "success": true, "timeline": [] })) }),
        );
        let api_base = serve(router).await;
        let client = ApiClient::new(
            ClientConfig {
                api_base,
                flavor: Flavor::Unified,
                timeout: Some(Duration::from_secs(5)),
            },
            Some(ResponseLogger::new(path.clone())),
        )
        .unwrap();

        let timeline = client
            .trace(&TraceRequest::from_input("oceans"))
            .await
            .expect("trace should succeed");
        assert!(timeline.is_empty());

        let mut contents = String::new();
        for _ in 0..50 {
            contents = tokio::fs::read_to_string(&path).await.unwrap_or_default();
            if contents.ends_with('\n') {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(contents, "trace 200 {\"success\":true,\"timeline\":[]}\n");
    }

    #[tokio::test]
    async fn mock_rejects_blank_topic() {
        let (client, handle) = mock_client(Flavor::Unified).await;

        let error = client
            .trace(&TraceRequest::Topic("   ".into()))
            .await
            .expect_err("blank topic should be rejected");
        assert!(matches!(
            error,
            ApiError::Status { status, .. } if status == StatusCode::BAD_REQUEST
        ));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected() {
        let router = Router::new().route(
            "/api/explore",
            post(|| async { axum::Json(json!({ "success": false, "error": "model offline" })) }),
        );
        let client = client_for(serve(router).await);

        let error = client
            .explore(&ExploreRequest::from_input("curiosity"))
            .await
            .expect_err("explore should fail");

        match error {
            ApiError::Rejected { endpoint, message } => {
                assert_eq!(endpoint, Endpoint::Explore);
                assert_eq!(message, "model offline");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_status_is_reported() {
        let router = Router::new().route(
            "/api/discover",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(serve(router).await);

        let error = client
            .discover(&DiscoverRequest::new(&[], &[], &[], "calm"))
            .await
            .expect_err("discover should fail");
        assert!(matches!(
            error,
            ApiError::Status { endpoint: Endpoint::Discover, status }
                if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn undecodable_body_is_reported() {
        let router = Router::new().route("/api/trace", post(|| async { "<html>oops</html>" }));
        let client = client_for(serve(router).await);

        let error = client
            .trace(&TraceRequest::from_input("oceans"))
            .await
            .expect_err("trace should fail");
        assert!(matches!(error, ApiError::Decode { endpoint: Endpoint::Trace, .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let error = client
            .trace(&TraceRequest::from_input("oceans"))
            .await
            .expect_err("trace should fail");
        assert!(matches!(error, ApiError::Transport(_)));
    }
}
