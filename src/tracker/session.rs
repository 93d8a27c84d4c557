use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;

use crate::error::TrackError;
use crate::tracker::location::{LocationProvider, Permission, Subscription, SubscriptionConfig};
use crate::tracker::recorder::TrackRecorder;
use crate::types::snapshot::{RideSummary, TrackSnapshot};

enum Command {
    Stop { reply: oneshot::Sender<RideSummary> },
}

/// Handle to a running tracking session. Snapshots read the last value
/// published by the session task, which the watch channel retains after
/// the task exits; the path therefore stays inspectable after stop or
/// stream loss, and `stop` on an ended session is a no-op.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<TrackSnapshot>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> TrackSnapshot {
        self.snapshot.borrow().clone()
    }

    pub async fn stop(&self) -> RideSummary {
        let (reply, result) = oneshot::channel();
        if self.commands.send(Command::Stop { reply }).await.is_ok() {
            if let Ok(summary) = result.await {
                return summary;
            }
        }

        // Session already ended: derive the summary from the retained
        // snapshot, so stop stays a no-op instead of an error.
        let snapshot = self.snapshot();
        RideSummary {
            distance_km: snapshot.distance_km,
            duration_seconds: snapshot.duration_seconds,
        }
    }
}

/// Starts a recording session: checks permission once, subscribes to the
/// position stream and spawns the task that owns the recorder. Fails with
/// `PermissionDenied` (and no session begins) when the provider denies.
pub fn spawn(
    provider: &dyn LocationProvider,
    config: SubscriptionConfig,
) -> Result<SessionHandle, TrackError> {
    if provider.request_permission() == Permission::Denied {
        return Err(TrackError::PermissionDenied);
    }

    let subscription = provider.subscribe(config);

    let mut recorder = TrackRecorder::new();
    recorder.start(Utc::now());

    let (snapshots, snapshot_rx) = watch::channel(recorder.snapshot());
    let (commands, command_rx) = mpsc::channel(4);

    tokio::spawn(run(recorder, subscription, snapshots, command_rx));

    Ok(SessionHandle {
        commands,
        snapshot: snapshot_rx,
    })
}

/// The single timeline of a session: position updates, the 1 s duration
/// tick and caller commands are multiplexed into one task, so events are
/// folded into the recorder strictly one at a time, in arrival order.
async fn run(
    mut recorder: TrackRecorder,
    subscription: Subscription,
    snapshots: watch::Sender<TrackSnapshot>,
    mut commands: mpsc::Receiver<Command>,
) {
    let Subscription {
        mut updates,
        producer,
    } = subscription;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // At most one pending tick; duration is recomputed from the wall
    // clock anyway, so skipped ticks cost nothing.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            command = commands.recv() => {
                // Unsubscribe before leaving Recording, so no update for
                // this session is delivered afterwards.
                producer.abort();
                let summary = recorder.stop(Utc::now());
                snapshots.send_replace(recorder.snapshot());

                match command {
                    Some(Command::Stop { reply }) => {
                        let _ = reply.send(summary);
                        tracing::info!(
                            "Session stopped: {:.2} km in {} s",
                            summary.distance_km,
                            summary.duration_seconds
                        );
                    }
                    // All handles dropped (e.g. session evicted).
                    None => tracing::debug!("Session abandoned, shutting down"),
                }
                break;
            }
            update = updates.recv() => {
                match update {
                    Some(point) => {
                        if let Err(err) = recorder.record(point) {
                            tracing::warn!("Discarding sample: {err}");
                        }
                        snapshots.send_replace(recorder.snapshot());
                    }
                    None => {
                        // Stream ended without a stop command: freeze the
                        // metrics and report the loss.
                        recorder.mark_lost(Utc::now());
                        snapshots.send_replace(recorder.snapshot());
                        tracing::warn!("Position stream ended before stop; session is idle");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                recorder.tick(Utc::now());
                snapshots.send_replace(recorder.snapshot());
            }
        }
    }
}
