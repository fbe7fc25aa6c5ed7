//! In-process stand-in for the content-discovery service. Serves canned
//! talks under both endpoint flavors.

mod fixtures;

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};
use thiserror::Error;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle, time};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Simulated backend latency applied to every reply.
    pub delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            delay: Duration::from_millis(1_000),
        }
    }
}

#[derive(Clone)]
struct HttpState {
    delay: Duration,
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<Result<(), std::io::Error>>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            if tx.send(()).is_err() {
                warn!("mock backend shutdown signal receiver dropped");
            }
        }

        let mut join_handle = match self.join_handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };

        tokio::select! {
            join_result = &mut join_handle => match join_result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(error)) => Err(ServerError::Io(error)),
                Err(error) => Err(ServerError::Join(error)),
            },
            _ = time::sleep(Duration::from_secs(2)) => {
                warn!("mock backend shutdown timed out; aborting");
                join_handle.abort();
                Ok(())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server task failed to join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn spawn(config: ServerConfig) -> Result<ServerHandle, ServerError> {
    let listener = TcpListener::bind(config.bind_addr).await?;

    let router = Router::new()
        .route("/api/explore", post(explore))
        .route("/api/discover", post(discover))
        .route("/api/trace", post(trace))
        .route("/api/whywatch", post(why_watch))
        .route("/api/recs", post(recs))
        .route("/api/playlist", post(playlist))
        .route("/api/timeline", post(timeline))
        .with_state(HttpState {
            delay: config.delay,
        });

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let addr = listener.local_addr()?;

    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });

    let join_handle = tokio::spawn(async move {
        if let Err(error) = server.await {
            warn!(?error, "mock backend terminated with error");
            Err(error)
        } else {
            Ok(())
        }
    });

    info!(%addr, "mock backend listening");

    Ok(ServerHandle {
        addr,
        shutdown: Some(shutdown_tx),
        join_handle: Some(join_handle),
    })
}

type Reply = (StatusCode, Json<Value>);

fn field<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    })
}

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

fn missing(what: &str) -> Reply {
    debug!(what, "mock backend rejected empty request");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": format!("{} is required", what) })),
    )
}

async fn simulate_latency(state: &HttpState) {
    if !state.delay.is_zero() {
        time::sleep(state.delay).await;
    }
}

async fn explore(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    let url = field(&body, &["url"]);
    let Some(subject) = url.or_else(|| field(&body, &["query"])) else {
        return missing("url or query");
    };

    let mut data = json!({
        "summary": format!("An overview of the ideas behind {}.", subject),
        "why_watch": fixtures::why_watch(),
        "recommendations": fixtures::recommendations(),
    });
    if let Some(url) = url {
        data["talk"] = fixtures::featured_talk(url);
    }

    ok(json!({ "success": true, "data": data }))
}

async fn discover(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    if field(&body, &["mood_activity", "mood", "activity", "free_text"]).is_none() {
        return missing("mood or activity");
    }

    ok(json!({ "success": true, "recommendations": fixtures::playlist() }))
}

async fn trace(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    if field(&body, &["topic", "url"]).is_none() {
        return missing("topic");
    }

    ok(json!({ "success": true, "timeline": fixtures::timeline_published() }))
}

async fn why_watch(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    if field(&body, &["url", "query"]).is_none() {
        return missing("url");
    }

    ok(json!({ "text": fixtures::why_watch() }))
}

async fn recs(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    match field(&body, &["url", "query"]) {
        Some(url) => ok(json!({
            "talk": fixtures::featured_talk(url),
            "list": fixtures::recommendations(),
        })),
        None => missing("url"),
    }
}

async fn playlist(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    if field(&body, &["mood"]).is_none() {
        return missing("mood");
    }

    ok(json!({ "talks": fixtures::playlist() }))
}

async fn timeline(State(state): State<HttpState>, Json(body): Json<Value>) -> Reply {
    simulate_latency(&state).await;

    if field(&body, &["topic", "url"]).is_none() {
        return missing("topic");
    }

    ok(json!({ "talks": fixtures::timeline_calendar() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State<HttpState> {
        State(HttpState {
            delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn explore_handler_includes_talk_for_urls() {
        let (status, Json(body)) = explore(
            state(),
            Json(json!({ "url": "https://ted.com/talks/x" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["talk"]["url"], json!("https://ted.com/talks/x"));
    }

    #[tokio::test]
    async fn explore_handler_omits_talk_for_queries() {
        let (status, Json(body)) = explore(state(), Json(json!({ "query": "oceans" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].get("talk").is_none());
    }

    #[tokio::test]
    async fn discover_handler_requires_some_mood() {
        let (status, Json(body)) = discover(state(), Json(json!({ "free_text": "  " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("mood or activity is required"));
    }

    #[tokio::test]
    async fn spawn_binds_ephemeral_port_and_shuts_down() {
        let handle = spawn(ServerConfig {
            delay: Duration::ZERO,
            ..ServerConfig::default()
        })
        .await
        .expect("server should bind");

        assert_ne!(handle.addr().port(), 0);
        handle.shutdown().await.expect("shutdown should succeed");
    }
}
