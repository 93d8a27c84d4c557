use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::tracker::geo::haversine_distance;
use crate::types::geo::GeoPoint;
use crate::types::source::ReplayTrack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy)]
pub enum Accuracy {
    Balanced,
    High,
    Navigation,
}

#[derive(Debug, Clone, Copy)]
pub struct SubscriptionConfig {
    pub accuracy: Accuracy,
    pub min_distance_meters: f64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            accuracy: Accuracy::Navigation,
            min_distance_meters: 10.0,
        }
    }
}

/// A live position stream. Dropping the receiver or calling `cancel`
/// ends the stream; no further updates are delivered after cancellation.
pub struct Subscription {
    pub updates: mpsc::Receiver<GeoPoint>,
    pub producer: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.producer.abort();
    }
}

/// Source of position updates: permission gate plus a cancellable,
/// push-based stream of samples.
pub trait LocationProvider: Send + Sync {
    fn request_permission(&self) -> Permission;
    fn subscribe(&self, config: SubscriptionConfig) -> Subscription;
}

/// Replays an uploaded activity file as a live position stream. Points
/// are emitted in file order, filtered by the configured minimum
/// movement, and stamped with the emission time (the moment they are
/// "observed"). When the file is exhausted the stream ends.
pub struct ReplayProvider {
    track: Arc<ReplayTrack>,
    pace: Duration,
    permission: Permission,
}

impl ReplayProvider {
    pub fn new(track: Arc<ReplayTrack>, pace: Duration) -> Self {
        Self {
            track,
            pace,
            permission: Permission::Granted,
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }
}

impl LocationProvider for ReplayProvider {
    fn request_permission(&self) -> Permission {
        self.permission
    }

    fn subscribe(&self, config: SubscriptionConfig) -> Subscription {
        tracing::debug!(
            "Replay subscription: {:?} accuracy, min movement {} m, {} points",
            config.accuracy,
            config.min_distance_meters,
            self.track.points.len()
        );

        let (tx, rx) = mpsc::channel(32);
        let track = self.track.clone();
        let pace = self.pace;

        let producer = tokio::spawn(async move {
            let mut last_emitted: Option<(f64, f64)> = None;

            for point in &track.points {
                if let Some((lat, lon)) = last_emitted {
                    let meters =
                        haversine_distance(lat, lon, point.latitude, point.longitude) * 1000.0;
                    if meters < config.min_distance_meters {
                        continue;
                    }
                }
                last_emitted = Some((point.latitude, point.longitude));

                let sample = GeoPoint::new(point.latitude, point.longitude, Utc::now());
                if tx.send(sample).await.is_err() {
                    return; // Consumer unsubscribed
                }

                if !pace.is_zero() {
                    tokio::time::sleep(pace).await;
                }
            }
        });

        Subscription {
            updates: rx,
            producer,
        }
    }
}
