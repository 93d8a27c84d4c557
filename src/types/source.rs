use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Gpx,
    Fit,
}

impl SourceFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "gpx" => Some(SourceFormat::Gpx),
            "fit" => Some(SourceFormat::Fit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Gpx => "gpx",
            SourceFormat::Fit => "fit",
        }
    }
}

/// A position parsed from a replay file. The original recording time is
/// kept for reference; points are re-stamped at emission time when
/// replayed as a live stream.
#[derive(Debug, Clone, Copy)]
pub struct ReplayPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub time: Option<DateTime<Utc>>,
}

/// An uploaded replay source: the ordered positions of one activity file.
#[derive(Debug, Clone)]
pub struct ReplayTrack {
    pub points: Vec<ReplayPoint>,
    pub format: SourceFormat,
}
