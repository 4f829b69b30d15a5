use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    geometry::Side,
    state::{SharedState, hub::VizEvent},
};

const REPORT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuilder { source: reqwest::Error },
    #[error("goal report request failed: {source}")]
    Request { source: reqwest::Error },
    #[error("scoring backend answered {0}")]
    Status(StatusCode),
}

/// Forwards confirmed goals to the scoring backend.
#[derive(Clone)]
pub struct GoalReporter {
    client: Client,
    base_url: Arc<str>,
}

impl GoalReporter {
    pub fn new(base_url: &str) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(REPORT_TIMEOUT)
            .build()
            .map_err(|source| ReportError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn goal_url(&self, scorer: Side) -> String {
        format!("{}/goal?team={}", self.base_url, scorer.team_code())
    }

    /// Report one goal. Failures are not retried.
    pub async fn report(&self, scorer: Side) -> Result<(), ReportError> {
        let response = self
            .client
            .get(self.goal_url(scorer))
            .send()
            .await
            .map_err(|source| ReportError::Request { source })?;
        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(ReportError::Status(status)),
        }
    }
}

/// Report every `goal_scored` event published on the hub until the render loop stops.
pub fn spawn(state: SharedState, reporter: GoalReporter) -> JoinHandle<()> {
    let mut receiver = state.hub().subscribe();
    let mut watcher = state.render_loop().watcher();
    tokio::spawn(async move {
        info!(url = %reporter.base_url, "goal reporter started");
        while state.render_loop().is_running() {
            tokio::select! {
                received = receiver.recv() => match received {
                    Ok(VizEvent::GoalScored(goal)) => match reporter.report(goal.scorer).await {
                        Ok(()) => info!(team = %goal.team, "goal reported to scoring backend"),
                        Err(err) => warn!(team = %goal.team, error = %err, "failed to report goal"),
                    },
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "goal reporter lagging; some events were dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                changed = watcher.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!("goal reporter stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        net::SocketAddr,
        sync::Mutex,
        time::Instant,
    };

    use axum::{Router, extract::Query, routing::get};
    use tokio::{net::TcpListener, time::timeout};

    use super::*;
    use crate::{config::AppConfig, dto::ws::PositionMessage, state::AppState};

    type Hits = Arc<Mutex<Vec<String>>>;

    /// Scoring backend stand-in: `/goal` records the team, `/broken/goal` fails.
    async fn scoring_backend() -> (SocketAddr, Hits) {
        let hits = Hits::default();
        let recorded = hits.clone();
        let app = Router::new()
            .route(
                "/goal",
                get(move |Query(query): Query<HashMap<String, String>>| {
                    let recorded = recorded.clone();
                    async move {
                        let team = query.get("team").cloned().unwrap_or_default();
                        recorded.lock().unwrap().push(team);
                        "ok"
                    }
                }),
            )
            .route(
                "/broken/goal",
                get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, hits)
    }

    #[test]
    fn goal_url_carries_the_scoring_team() {
        let reporter = GoalReporter::new("http://10.0.0.2:5000/").unwrap();
        assert_eq!(
            reporter.goal_url(Side::Right),
            "http://10.0.0.2:5000/goal?team=B"
        );
        assert_eq!(
            reporter.goal_url(Side::Left),
            "http://10.0.0.2:5000/goal?team=A"
        );
    }

    #[tokio::test]
    async fn scored_goal_is_reported_once() {
        let (addr, hits) = scoring_backend().await;
        let state = AppState::new(AppConfig::default()).unwrap();
        let reporter = GoalReporter::new(&format!("http://{addr}")).unwrap();
        let handle = spawn(state.clone(), reporter);

        let puck_in_left_goal =
            PositionMessage::from_json_str(r#"{"puck": {"x": 0, "y": 200}}"#).unwrap();
        let now = Instant::now();
        state
            .with_viz(|viz| {
                viz.ingest(&puck_in_left_goal, now);
                viz.tick(now);
                // still in the mouth, but the detector is cooling down
                viz.tick(now + Duration::from_millis(16));
            })
            .await;

        timeout(Duration::from_secs(3), async {
            while hits.lock().unwrap().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("goal never reached the scoring backend");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*hits.lock().unwrap(), vec!["B".to_string()]);

        state.destroy();
        timeout(Duration::from_secs(3), handle)
            .await
            .expect("reporter kept running after destroy")
            .unwrap();
    }

    #[tokio::test]
    async fn non_success_reply_is_a_status_error() {
        let (addr, hits) = scoring_backend().await;
        let reporter = GoalReporter::new(&format!("http://{addr}/broken/")).unwrap();

        let result = reporter.report(Side::Left).await;

        assert!(matches!(
            result,
            Err(ReportError::Status(status)) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(hits.lock().unwrap().is_empty());
    }
}
