//! Session tracking over an injected keyed store.
//!
//! Two expiry mechanisms coexist and are never unified: the store evicts
//! entries untouched for longer than its rolling idle window, and [`ping`]
//! enforces an absolute cap of [`SESSION_MAX_AGE_MS`] measured from the first
//! ping of the session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Mutex;

/// Absolute session lifetime enforced by the ping operation.
pub const SESSION_MAX_AGE_MS: i64 = 60 * 60 * 1000;

/// Idle window used when none is configured.
pub const DEFAULT_IDLE_WINDOW: Duration = Duration::from_secs(30);

/// State held per opaque session identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Unix-epoch milliseconds of the first ping. Set at most once per
    /// session lifetime.
    pub start_time: Option<i64>,
}

/// Keyed session store: read, write and destroy by opaque identifier.
///
/// Implementations own their rolling idle expiry; callers never see an entry
/// the store considers idle-expired. `destroy` must have completed its
/// removal when it returns, since responses are sequenced after it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Option<SessionState>;
    async fn save(&self, id: &str, state: SessionState);
    async fn destroy(&self, id: &str);
}

struct Entry {
    state: SessionState,
    last_seen: Instant,
}

/// In-memory [`SessionStore`] with rolling idle eviction.
///
/// Every load or save refreshes the entry's idle clock and prunes entries
/// that outlived the idle window.
pub struct MemorySessionStore {
    idle_window: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(idle_window: Duration) -> Self {
        Self {
            idle_window,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_WINDOW)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Option<SessionState> {
        let idle_window = self.idle_window;
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.last_seen.elapsed() < idle_window);
        entries.get_mut(id).map(|entry| {
            entry.last_seen = Instant::now();
            entry.state.clone()
        })
    }

    async fn save(&self, id: &str, state: SessionState) {
        let idle_window = self.idle_window;
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.last_seen.elapsed() < idle_window);
        entries.insert(
            id.to_string(),
            Entry {
                state,
                last_seen: Instant::now(),
            },
        );
    }

    async fn destroy(&self, id: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(id);
    }
}

/// Outcome of a ping against a session.
#[derive(Debug, PartialEq, Eq)]
pub enum PingOutcome {
    /// Session is within the absolute cap; `remaining_ms` is the budget left.
    Extended { remaining_ms: i64 },
    /// Session outlived the absolute cap and its store entry was destroyed.
    Expired,
}

#[derive(Debug)]
pub struct PingResult {
    pub session_id: String,
    pub outcome: PingOutcome,
}

/// Stamp, extend or expire a session.
///
/// An absent or unknown identifier starts a fresh session under a new
/// identifier. The first ping records `start_time`; later pings compare
/// `now_ms` against it. When the elapsed time exceeds the cap, the store
/// entry is destroyed before the result is returned.
///
/// # Errors
///
/// Returns an error when a fresh session identifier cannot be generated.
pub async fn ping(
    store: &dyn SessionStore,
    presented: Option<&str>,
    now_ms: i64,
) -> Result<PingResult> {
    let (session_id, state) = match presented {
        Some(id) => match store.load(id).await {
            Some(state) => (id.to_string(), state),
            None => (generate_session_id()?, SessionState::default()),
        },
        None => (generate_session_id()?, SessionState::default()),
    };

    let start_time = match state.start_time {
        Some(start) => start,
        None => {
            store
                .save(
                    &session_id,
                    SessionState {
                        start_time: Some(now_ms),
                    },
                )
                .await;
            now_ms
        }
    };

    let elapsed = now_ms - start_time;

    if elapsed > SESSION_MAX_AGE_MS {
        // Respond only after the delete is acknowledged
        store.destroy(&session_id).await;

        return Ok(PingResult {
            session_id,
            outcome: PingOutcome::Expired,
        });
    }

    Ok(PingResult {
        session_id,
        outcome: PingOutcome::Extended {
            remaining_ms: SESSION_MAX_AGE_MS - elapsed,
        },
    })
}

/// Opaque identifier for the session cookie.
fn generate_session_id() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session id")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

pub fn now_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
