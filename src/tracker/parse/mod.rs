mod fit;
mod gpx;

use crate::error::ParseError;
use crate::types::source::{ReplayTrack, SourceFormat};

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<ReplayTrack, ParseError>;
}

pub fn parse(bytes: &[u8], format: SourceFormat) -> Result<ReplayTrack, ParseError> {
    match format {
        SourceFormat::Gpx => gpx::GpxParser.parse(bytes),
        SourceFormat::Fit => fit::FitParser.parse(bytes),
    }
}
