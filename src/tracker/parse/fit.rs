use crate::error::ParseError;
use crate::tracker::parse::Parser;
use crate::types::source::{ReplayPoint, ReplayTrack, SourceFormat};
use chrono::DateTime;
use fitparser::profile::MesgNum;

pub struct FitParser;

impl Parser for FitParser {
    fn parse(&self, bytes: &[u8]) -> Result<ReplayTrack, ParseError> {
        let data = fitparser::from_bytes(bytes)
            .map_err(|e| ParseError::InvalidFit(format!("Failed to parse FIT file: {}", e)))?;

        let mut points = Vec::new();

        for record in data {
            if record.kind() != MesgNum::Record {
                continue;
            }

            let mut point = ReplayPoint {
                latitude: 0.0,
                longitude: 0.0,
                time: None,
            };

            let mut has_position = false;

            for field in record.fields() {
                match field.name() {
                    "position_lat" => {
                        if let fitparser::Value::SInt32(val) = field.value() {
                            point.latitude = semicircles_to_degrees(*val);
                            has_position = true;
                        }
                    }
                    "position_long" => {
                        if let fitparser::Value::SInt32(val) = field.value() {
                            point.longitude = semicircles_to_degrees(*val);
                            has_position = true;
                        }
                    }
                    "timestamp" => {
                        if let fitparser::Value::Timestamp(val) = field.value() {
                            point.time = DateTime::from_timestamp(val.timestamp(), 0);
                        }
                    }
                    _ => {}
                }
            }

            if has_position {
                points.push(point);
            }
        }

        if points.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ReplayTrack {
            points,
            format: SourceFormat::Fit,
        })
    }
}

fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}
