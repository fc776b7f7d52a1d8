//! One polling invocation: seed unknown channels, fan the forwarder out
//! across all stored channels, write mutated documents back, report.

use crate::app::{AppContext, FreshetError, Result};
use crate::bootstrap;
use crate::store::Store;

#[derive(Debug)]
pub struct RunReport {
    pub total_delivered: usize,
    pub channels: usize,
    pub failed_writebacks: usize,
}

impl RunReport {
    pub fn summary(&self) -> String {
        if self.total_delivered == 0 {
            "no new items".to_string()
        } else {
            format!("delivered {} items", self.total_delivered)
        }
    }
}

/// Run one delivery pass over every stored channel.
///
/// Bootstrap failures are logged and the run continues; failing to
/// enumerate channels is fatal to the invocation. Everything below the
/// channel level is contained inside the forwarder.
pub async fn run_once(ctx: &AppContext) -> Result<RunReport> {
    if let Err(e) = bootstrap::ensure_channels(
        ctx.store.as_ref(),
        &ctx.fetcher,
        &ctx.catalog,
        &ctx.settings.channels,
        &ctx.settings.delivery,
    )
    .await
    {
        tracing::warn!("Failed to ensure default channels: {}", e);
    }

    let channels = ctx.store.all_channels()?;
    let outcomes = ctx.parallel_forwarder.process_all(channels).await;

    let mut total_delivered = 0;
    let mut failed_writebacks = 0;
    let processed = outcomes.len();

    for outcome in outcomes {
        if outcome.mutated {
            match ctx.store.replace_channel(&outcome.channel) {
                Ok(_) => {}
                Err(FreshetError::WriteConflict(id)) => {
                    failed_writebacks += 1;
                    tracing::warn!(
                        "Channel {} changed during the run; cursor write-back dropped, \
                         its items may redeliver next run",
                        id
                    );
                }
                Err(e) => {
                    failed_writebacks += 1;
                    tracing::warn!(
                        "Failed to write back channel {}: {}",
                        outcome.channel.id,
                        e
                    );
                }
            }
        }

        total_delivered += outcome.new_items;
        tracing::info!(
            "Processed {} new items for channel {}",
            outcome.new_items,
            outcome.channel.id
        );
    }

    Ok(RunReport {
        total_delivered,
        channels: processed,
        failed_writebacks,
    })
}
