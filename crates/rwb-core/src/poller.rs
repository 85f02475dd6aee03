//! Long-polling update loop.
//!
//! Only the loop mutates the cursor, and only between polls. The next
//! `fetch_updates` call is issued strictly after the previous batch was
//! dispatched, so cursor advancement is ordered without locks.

use std::{collections::HashSet, sync::Arc, time::Duration};

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::{dispatcher::Dispatcher, domain::UpdateId, ports::UpdateSource, Result};

/// Boundary between processed and not-yet-seen updates. Never moves backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor(Option<i64>);

impl Cursor {
    /// Offset to send with the next poll; `None` until the first update is seen.
    pub fn offset(&self) -> Option<i64> {
        self.0
    }

    /// Record a processed update: cursor becomes `max(cursor, id + 1)`.
    pub fn observe(&mut self, id: UpdateId) {
        let next = id.0.saturating_add(1);
        self.0 = Some(self.0.map_or(next, |cur| cur.max(next)));
    }

    fn is_behind(&self, id: UpdateId) -> bool {
        self.0.is_some_and(|cur| id.0 < cur)
    }
}

/// Exponential delay between failed polls, reset by the first successful one.
///
/// A zero base disables waiting entirely (immediate re-poll).
#[derive(Clone, Debug)]
pub struct RetryBackoff {
    base: Duration,
    max: Duration,
    failures: u32,
}

impl RetryBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            failures: 0,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let factor = 1u32.checked_shl(self.failures.min(31)).unwrap_or(u32::MAX);
        self.failures = self.failures.saturating_add(1);
        self.base.saturating_mul(factor).min(self.max)
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }
}

/// Result of one successful poll cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOutcome {
    pub received: usize,
    pub dispatched: usize,
}

pub struct UpdateLoop {
    source: Arc<dyn UpdateSource>,
    dispatcher: Dispatcher,
    cursor: Cursor,
    poll_timeout: Duration,
    backoff: RetryBackoff,
}

impl UpdateLoop {
    pub fn new(
        source: Arc<dyn UpdateSource>,
        dispatcher: Dispatcher,
        poll_timeout: Duration,
        backoff: RetryBackoff,
    ) -> Self {
        Self {
            source,
            dispatcher,
            cursor: Cursor::default(),
            poll_timeout,
            backoff,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// One poll → dispatch → advance cycle. On error the cursor is untouched.
    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        let batch = self
            .source
            .fetch_updates(self.cursor.offset(), self.poll_timeout)
            .await?;

        let mut seen = HashSet::new();
        let fresh: Vec<_> = batch
            .iter()
            .filter(|u| {
                if self.cursor.is_behind(u.id) || !seen.insert(u.id) {
                    tracing::debug!(update_id = u.id.0, "skipping already processed update");
                    return false;
                }
                true
            })
            .collect();

        // Updates of one batch may be handled concurrently; the cursor waits for all of them.
        join_all(fresh.iter().map(|u| self.dispatcher.dispatch(u))).await;

        for u in &batch {
            self.cursor.observe(u.id);
        }
        if !batch.is_empty() {
            tracing::debug!(offset = ?self.cursor.offset(), "cursor advanced");
        }

        Ok(PollOutcome {
            received: batch.len(),
            dispatched: fresh.len(),
        })
    }

    /// Poll until `shutdown` fires. Errors are logged and never stop the loop.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                r = self.poll_once() => r,
            };

            match result {
                Ok(_) => self.backoff.reset(),
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    tracing::error!(error = %e, retry_in = ?delay, "failed to fetch updates");
                    if !delay.is_zero() {
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            }
        }
        tracing::info!(offset = ?self.cursor.offset(), "update loop stopped");
    }
}
