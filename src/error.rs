//! Error types for acquisition, calibration and configuration

use std::io;

use crate::types::Channel;

/// Failure to turn a device read into a [`SensorSample`](crate::SensorSample)
///
/// Every variant is a per-cycle fault: the poll loop logs it and moves on
/// to the next cycle.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{channel} source {location} unavailable: {source}")]
    SourceUnavailable {
        channel: Channel,
        location: String,
        #[source]
        source: io::Error,
    },

    /// `fields` is 0 and `record` carries the decode error when the
    /// attribute is not UTF-8 text
    #[error("malformed {channel} record {record:?}: expected 3 comma-separated fields, found {fields}")]
    MalformedRecord {
        channel: Channel,
        record: String,
        fields: usize,
    },

    #[error("invalid {channel} number {field:?} on axis {axis}")]
    InvalidNumber {
        channel: Channel,
        axis: char,
        field: String,
    },
}

/// Crate-level error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid calibration profile: {0}")]
    InvalidCalibrationProfile(String),

    #[error("invalid setting {name}={value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("cannot install termination handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

impl Error {
    /// True when the failure only spoils the current poll cycle
    ///
    /// Anything else is a startup fault and the loop must not run.
    pub fn is_cycle_fault(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
