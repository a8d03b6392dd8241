//! Serial replay of observations over a channel.

use barstream_core::types::Observation;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Replay `observations` in order on a background task.
///
/// The consumer applies each one to the manager as it arrives, so there is a
/// single producer and observations are processed serially. The task ends
/// early if the receiver is dropped and returns how many were delivered.
pub fn spawn_feed(
    observations: Vec<Observation>,
    buffer: usize,
) -> (mpsc::Receiver<Observation>, JoinHandle<usize>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));

    let handle = tokio::spawn(async move {
        let mut sent = 0;
        for observation in observations {
            if tx.send(observation).await.is_err() {
                debug!("Feed receiver dropped after {} observations", sent);
                break;
            }
            sent += 1;
        }
        sent
    });

    (rx, handle)
}
