//! HTTP intake: queues `POST /ostrich` requests to a single-consumer worker
//! that retries the workflow driver up to 3 times, 10 seconds apart.
//!
//! Shape grounded in the teacher's `server::start_server` (axum router,
//! `TraceLayer`, `GET /` health check); the worker-queue/retry loop mirrors
//! the original `main.go`'s goroutine-and-channel dispatch.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::driver::{self, WorkflowArgs};
use crate::error::OstrichError;
use crate::fs::RealFs;
use crate::vcs::GitCli;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(10);

enum WorkItem {
    Ostrich(WorkflowArgs),
    Done,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OstrichRequestBody {
    repository: String,
    from_branch: String,
    ostrich_branch: String,
    #[serde(rename = "commitID")]
    commit_id: String,
}

impl From<OstrichRequestBody> for WorkflowArgs {
    fn from(body: OstrichRequestBody) -> Self {
        WorkflowArgs {
            repository: body.repository,
            from_branch: body.from_branch,
            ostrich_branch: body.ostrich_branch,
            commit_id: body.commit_id,
        }
    }
}

#[derive(Clone)]
struct AppState {
    queue: mpsc::UnboundedSender<WorkItem>,
}

/// Start the HTTP intake server on `port`, spawning the single worker task.
pub async fn start_server(port: u16) -> Result<(), OstrichError> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_worker(rx));

    let state = Arc::new(AppState { queue: tx });

    let app = Router::new()
        .route("/", get(health_check))
        .route("/ostrich", post(enqueue_ostrich))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "starting ostrich intake server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| OstrichError::Other(format!("failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| OstrichError::Other(format!("server error: {e}")))?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

async fn enqueue_ostrich(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OstrichRequestBody>,
) -> impl IntoResponse {
    let args: WorkflowArgs = body.into();
    tracing::info!(
        repository = %args.repository,
        commit_id = %args.commit_id,
        "queued ostrich request"
    );
    let _ = state.queue.send(WorkItem::Ostrich(args));
    (StatusCode::OK, Json(serde_json::json!({})))
}

/// The single consumer. Never spawned more than once: the driver's chdir
/// mutates process-global state, so only one workflow may run at a time.
async fn run_worker(mut rx: mpsc::UnboundedReceiver<WorkItem>) {
    while let Some(item) = rx.recv().await {
        match item {
            WorkItem::Done => break,
            WorkItem::Ostrich(args) => {
                for attempt in 1..=MAX_ATTEMPTS {
                    let result = {
                        let args = args.clone();
                        tokio::task::spawn_blocking(move || {
                            driver::run_workflow(&args, &GitCli, &RealFs)
                        })
                        .await
                    };

                    match result {
                        Ok(Ok(())) => break,
                        Ok(Err(e)) => {
                            tracing::error!(error = %e, attempt, "ostrich workflow failed");
                            if attempt < MAX_ATTEMPTS {
                                tokio::time::sleep(RETRY_DELAY).await;
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, attempt, "ostrich worker task panicked");
                            if attempt < MAX_ATTEMPTS {
                                tokio::time::sleep(RETRY_DELAY).await;
                            }
                        }
                    }
                }
            }
        }
    }
}
