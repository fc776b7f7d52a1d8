use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::Channel;
use crate::forwarder::{ChannelOutcome, Forwarder};

pub const DEFAULT_IN_FLIGHT: usize = 3;

/// Fans the [`Forwarder`] out across channels, bounded by a semaphore so a
/// large channel count cannot stampede upstream feeds or the Discord API.
pub struct ParallelForwarder {
    forwarder: Arc<Forwarder>,
    semaphore: Arc<Semaphore>,
}

impl ParallelForwarder {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self::with_bound(forwarder, DEFAULT_IN_FLIGHT)
    }

    pub fn with_bound(forwarder: Arc<Forwarder>, bound: usize) -> Self {
        Self {
            forwarder,
            semaphore: Arc::new(Semaphore::new(bound)),
        }
    }

    /// Process every channel and collect all outcomes. One channel's
    /// failures never abort another's; a task that dies is logged and
    /// excluded from the collected results.
    pub async fn process_all(&self, channels: Vec<Channel>) -> Vec<ChannelOutcome> {
        let mut handles = Vec::new();

        for channel in channels {
            let forwarder = self.forwarder.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");
                forwarder.process_channel(channel).await
            });

            handles.push(handle);
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Channel task join error: {}", e);
                }
            }
        }

        outcomes
    }
}
