//! Waiting for uploaded media to become usable for inference

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use vidquest_core::error::{Error, Result};
use vidquest_core::{InferenceService, MediaHandle, MediaStatus, PollPolicy};

/// Poll the service until `handle` is active.
///
/// The delay between polls starts at `policy.initial_interval` and doubles up
/// to `policy.max_interval`. Gives up with [`Error::Timeout`] once
/// `policy.max_wait` has elapsed and with [`Error::Cancelled`] as soon as
/// `cancel` fires.
pub async fn wait_until_ready(
    service: &dyn InferenceService,
    handle: &MediaHandle,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> Result<()> {
    let started = Instant::now();
    let mut interval = policy.initial_interval;
    let mut polls = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        polls += 1;
        match service.media_status(handle).await? {
            MediaStatus::Active => {
                debug!(
                    "Media {} active after {polls} poll(s) in {:?}",
                    handle.name,
                    started.elapsed()
                );
                return Ok(());
            }
            MediaStatus::Failed(reason) => {
                return Err(Error::MediaProcessing {
                    name: handle.name.clone(),
                    reason: reason.unwrap_or_else(|| "service reported FAILED".to_string()),
                });
            }
            MediaStatus::Processing => {
                debug!("Media {} still processing (poll {polls})", handle.name);
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.max_wait {
            return Err(Error::timeout(
                format!("media '{}' to become active", handle.name),
                elapsed,
            ));
        }

        let delay = interval.min(policy.max_wait - elapsed);
        tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        interval = policy.next_interval(interval);
    }
}
