use serde::{Deserialize, Serialize};

use crate::types::geo::PathPoint;

/// Point-in-time summary of a tracking session, exposed to the display
/// surface. Distance and speed are rounded here, at the reporting
/// boundary; the recorder accumulates at full precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub distance_km: f64,
    pub duration_seconds: u64,
    pub speed_kmh: f64,
    pub path: Vec<PathPoint>,
    pub active: bool,
    pub tracking_lost: bool,
}

/// Final summary returned by stop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RideSummary {
    pub distance_km: f64,
    pub duration_seconds: u64,
}

pub fn round_km(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round_kmh(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
