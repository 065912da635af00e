use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::errors::TrendError;
use crate::models::{SalesPoint, SessionView, TrendId};
use crate::services::dashboard_controller::DashboardController;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session task has stopped")]
    Closed,
    #[error(transparent)]
    Trend(#[from] TrendError),
}

type Reply = oneshot::Sender<Result<SessionView, TrendError>>;

/// User actions, applied one at a time by the task that owns the controller.
#[derive(Debug)]
enum SessionCommand {
    /// `series` is `None` when the item key had no data.
    Select {
        key: String,
        series: Option<Vec<SalesPoint>>,
        reply: Reply,
    },
    Toggle {
        id: TrendId,
        reply: Reply,
    },
    ResetAll {
        reply: Reply,
    },
    SetCustom {
        intercept: f64,
        slope: f64,
        reply: Reply,
    },
    View {
        reply: Reply,
    },
}

fn view(controller: &DashboardController) -> SessionView {
    SessionView {
        visibility: *controller.visibility(),
        custom_params: *controller.custom_params(),
        snapshot: controller.snapshot(),
    }
}

fn apply(controller: &mut DashboardController, command: SessionCommand) {
    let (result, reply) = match command {
        SessionCommand::Select { key, series, reply } => {
            let result = match series {
                Some(series) => controller.load_series(key, series),
                None => Err(TrendError::NoData(key)),
            };
            (result, reply)
        }
        SessionCommand::Toggle { id, reply } => {
            let visible = controller.toggle(id);
            debug!("Toggled {} -> {}", id, visible);
            (Ok(()), reply)
        }
        SessionCommand::ResetAll { reply } => {
            controller.reset_all();
            (Ok(()), reply)
        }
        SessionCommand::SetCustom { intercept, slope, reply } => {
            (controller.set_custom_params(intercept, slope), reply)
        }
        SessionCommand::View { reply } => (Ok(()), reply),
    };

    // Every action is answered with a fresh recomputation.
    let _ = reply.send(result.map(|_| view(controller)));
}

async fn run(mut controller: DashboardController, mut rx: mpsc::Receiver<SessionCommand>) {
    while let Some(command) = rx.recv().await {
        apply(&mut controller, command);
    }
    debug!("Session task finished");
}

/// Handle to a session task. Cloning shares the same session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Spawn a task that exclusively owns `controller`.
    pub fn spawn(controller: DashboardController) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run(controller, rx));
        Self { tx }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request(&self, build: impl FnOnce(Reply) -> SessionCommand) -> Result<SessionView, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(build(reply)).await.map_err(|_| SessionError::Closed)?;
        let result = rx.await.map_err(|_| SessionError::Closed)?;
        Ok(result?)
    }

    pub async fn select_item(
        &self,
        key: impl Into<String>,
        series: Option<Vec<SalesPoint>>,
    ) -> Result<SessionView, SessionError> {
        let key = key.into();
        self.request(|reply| SessionCommand::Select { key, series, reply }).await
    }

    pub async fn toggle(&self, id: TrendId) -> Result<SessionView, SessionError> {
        self.request(|reply| SessionCommand::Toggle { id, reply }).await
    }

    pub async fn reset_all(&self) -> Result<SessionView, SessionError> {
        self.request(|reply| SessionCommand::ResetAll { reply }).await
    }

    pub async fn set_custom_params(&self, intercept: f64, slope: f64) -> Result<SessionView, SessionError> {
        self.request(|reply| SessionCommand::SetCustom { intercept, slope, reply })
            .await
    }

    pub async fn view(&self) -> Result<SessionView, SessionError> {
        self.request(|reply| SessionCommand::View { reply }).await
    }
}

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// One session per signed-in user, keyed by email.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SessionEntry>>,
    forecast_months: i64,
}

impl SessionRegistry {
    pub fn new(forecast_months: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            forecast_months,
        }
    }

    /// The user's session, spawning a fresh one if none exists or the old task has stopped.
    pub fn get_or_spawn(&self, user: &str) -> SessionHandle {
        self.get_or_spawn_at(user, Instant::now())
    }

    fn get_or_spawn_at(&self, user: &str, now: Instant) -> SessionHandle {
        let mut entry = self.sessions.entry(user.to_string()).or_insert_with(|| {
            info!("Session started for {}", user);
            SessionEntry {
                handle: SessionHandle::spawn(DashboardController::new(self.forecast_months)),
                last_seen: now,
            }
        });
        if entry.handle.is_closed() {
            info!("Session for {} had stopped, starting a new one", user);
            entry.handle = SessionHandle::spawn(DashboardController::new(self.forecast_months));
        }
        entry.last_seen = now;
        entry.handle.clone()
    }

    /// Drop the user's session; its task ends once in-flight requests finish.
    pub fn remove(&self, user: &str) {
        self.sessions.remove(user);
    }

    /// Drop sessions not used for `max_idle`, returning how many were removed.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        self.sweep_idle_at(Instant::now(), max_idle)
    }

    fn sweep_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) < max_idle);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!("Swept {} idle sessions", removed);
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
