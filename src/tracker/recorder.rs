use chrono::{DateTime, Utc};

use crate::error::TrackError;
use crate::tracker::geo::haversine_distance;
use crate::types::geo::{GeoPoint, PathPoint};
use crate::types::snapshot::{round_km, round_kmh, RideSummary, TrackSnapshot};

/// Pure recording state machine: Idle -> Recording on `start`,
/// Recording -> Idle on `stop` (or stream loss), self-loops on every
/// position update and timer tick. Event delivery and timing live in
/// the session layer; this type only folds events into state.
pub struct TrackRecorder {
    active: bool,
    tracking_lost: bool,
    started_at: Option<DateTime<Utc>>,
    // Full-precision accumulator. Rounding happens only when a snapshot
    // or summary is reported, never here.
    distance_km: f64,
    duration_seconds: u64,
    path: Vec<GeoPoint>,
}

impl TrackRecorder {
    pub fn new() -> Self {
        Self {
            active: false,
            tracking_lost: false,
            started_at: None,
            distance_km: 0.0,
            duration_seconds: 0,
            path: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Full-precision accumulated distance.
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Begins a fresh session: the path, accumulator and duration of any
    /// previous session are discarded.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.active = true;
        self.tracking_lost = false;
        self.started_at = Some(now);
        self.distance_km = 0.0;
        self.duration_seconds = 0;
        self.path.clear();
    }

    /// Folds one position sample into the session: appends it to the path
    /// and adds the great-circle distance from the previous point to the
    /// accumulator. Identical consecutive points contribute zero. Samples
    /// with out-of-range or non-finite coordinates are discarded without
    /// touching any state.
    pub fn record(&mut self, point: GeoPoint) -> Result<(), TrackError> {
        if !self.active {
            return Ok(());
        }

        if !point.is_valid() {
            return Err(TrackError::InvalidSample {
                latitude: point.latitude,
                longitude: point.longitude,
            });
        }

        if let Some(last) = self.path.last() {
            self.distance_km += haversine_distance(
                last.latitude,
                last.longitude,
                point.latitude,
                point.longitude,
            );
        }
        self.path.push(point);

        Ok(())
    }

    /// Recomputes elapsed duration from the wall clock. Tick counting
    /// would drift; the exact difference cannot.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.active {
            self.refresh_duration(now);
        }
    }

    /// Ends the session and returns the final summary. Calling on an idle
    /// recorder is a no-op that returns the last-known summary.
    pub fn stop(&mut self, now: DateTime<Utc>) -> RideSummary {
        if self.active {
            self.refresh_duration(now);
            self.active = false;
        }
        self.summary()
    }

    /// The position stream ended without a stop: freeze metrics, leave
    /// Recording and flag the loss so the caller can inform the user.
    pub fn mark_lost(&mut self, now: DateTime<Utc>) {
        if self.active {
            self.refresh_duration(now);
            self.active = false;
            self.tracking_lost = true;
        }
    }

    pub fn summary(&self) -> RideSummary {
        RideSummary {
            distance_km: round_km(self.distance_km),
            duration_seconds: self.duration_seconds,
        }
    }

    /// Pure read of the current state. Speed is derived from the
    /// full-precision accumulator and reported as 0 while the duration is
    /// zero.
    pub fn snapshot(&self) -> TrackSnapshot {
        let speed_kmh = if self.duration_seconds > 0 {
            round_kmh(self.distance_km / (self.duration_seconds as f64 / 3600.0))
        } else {
            0.0
        };

        TrackSnapshot {
            distance_km: round_km(self.distance_km),
            duration_seconds: self.duration_seconds,
            speed_kmh,
            path: self.path.iter().map(PathPoint::from).collect(),
            active: self.active,
            tracking_lost: self.tracking_lost,
        }
    }

    fn refresh_duration(&mut self, now: DateTime<Utc>) {
        if let Some(started_at) = self.started_at {
            self.duration_seconds = (now - started_at).num_seconds().max(0) as u64;
        }
    }
}

impl Default for TrackRecorder {
    fn default() -> Self {
        Self::new()
    }
}
