//! Bounded-concurrency screening worker pool
//!
//! Fans per-symbol work onto tokio tasks gated by a semaphore and
//! streams outcomes back in completion order. Cancellation is
//! cooperative: checked at dispatch boundaries, never mid-fetch; once
//! the token fires, no new work is launched and in-flight work drains
//! into the stream.

use crate::jobs::types::{Outcome, SymbolOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum symbols in flight at once
    pub concurrency: usize,
    /// Delay between symbol dispatches; pacing policy, not correctness
    pub pacing: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            concurrency: 5,
            pacing: Duration::from_millis(100),
        }
    }
}

/// Run `per_symbol` for every symbol and return the outcome stream
///
/// Each invocation is isolated: `per_symbol` reports failures as
/// `Outcome::Error`, and one symbol's failure never aborts its
/// siblings or the pool. The receiver yields `None` once every
/// dispatched symbol has reported.
pub fn run<F, Fut>(
    symbols: Vec<String>,
    settings: PoolSettings,
    cancel: CancellationToken,
    per_symbol: F,
) -> mpsc::Receiver<SymbolOutcome>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    let concurrency = settings.concurrency.max(1);
    let (tx, rx) = mpsc::channel(concurrency);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let per_symbol = Arc::new(per_symbol);

    tokio::spawn(async move {
        for (index, symbol) in symbols.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(index, "cancellation observed, not dispatching further symbols");
                break;
            }

            let permit = tokio::select! {
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let tx = tx.clone();
            let per_symbol = Arc::clone(&per_symbol);
            tokio::spawn(async move {
                let outcome = per_symbol(symbol.clone()).await;
                // A closed channel means the consumer went away; the
                // outcome has nowhere to go either way.
                let _ = tx
                    .send(SymbolOutcome {
                        index,
                        symbol,
                        outcome,
                    })
                    .await;
                drop(permit);
            });

            if !settings.pacing.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(settings.pacing) => {}
                }
            }
        }
        // Dropping the dispatcher's sender closes the stream once all
        // in-flight workers have reported.
    });

    rx
}
