use std::collections::HashMap;
use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct FailureWindow {
    attempts: u32,
    window_start: DateTime<Utc>,
}

/// Fixed-window count of admin secret checks per client address.
///
/// Every check reserves an attempt before the secret is compared, and only a
/// successful check gives it back. Once `max_failures` attempts are held the
/// address is refused until the window that started with its first attempt
/// has passed, however many checks are in flight at once.
pub struct LoginLockout {
    max_failures: u32,
    window: Duration,
    entries: RwLock<HashMap<IpAddr, FailureWindow>>,
}

impl LoginLockout {
    /// `max_failures == 0` disables the lockout.
    pub fn new(max_failures: u32, window: Duration) -> Self {
        Self {
            max_failures,
            window,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Reserves an attempt for `client`. Returns the seconds to wait when the
    /// client is locked out, in which case nothing is reserved.
    pub async fn try_begin(&self, client: IpAddr) -> Result<(), u64> {
        self.try_begin_at(client, Utc::now()).await
    }

    /// Forgets every attempt from `client`, after a successful check.
    pub async fn clear(&self, client: IpAddr) {
        self.entries.write().await.remove(&client);
    }

    pub(crate) async fn try_begin_at(&self, client: IpAddr, now: DateTime<Utc>) -> Result<(), u64> {
        if self.max_failures == 0 {
            return Ok(());
        }

        // Check and reservation happen under one write lock
        let mut entries = self.entries.write().await;

        // Drop stale windows so the map does not grow without bound
        entries.retain(|_, entry| now < entry.window_start + self.window);

        let entry = entries.entry(client).or_insert(FailureWindow {
            attempts: 0,
            window_start: now,
        });

        if entry.attempts >= self.max_failures {
            // Round up so a client never retries a moment too early
            let remaining = (entry.window_start + self.window - now).num_milliseconds();
            return Err(((remaining + 999) / 1000).max(1) as u64);
        }

        entry.attempts += 1;
        Ok(())
    }
}
