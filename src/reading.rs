//! Reading and parsing of raw channel records
//!
//! A channel attribute holds text such as `"12.50,7.30,-3.10\n"`. Only the
//! first line is significant; anything after the first newline is ignored.

use std::io;

use nalgebra::Vector3;

use crate::error::ParseError;
use crate::source::{ChannelSource, DeviceFiles};
use crate::types::{Channel, ChannelRecord, SensorSample};

const AXES: [char; 3] = ['X', 'Y', 'Z'];

/// Read one sample from a channel
///
/// Read failures are reported as [`ParseError::SourceUnavailable`] with the
/// underlying I/O error attached. There is no retry.
///
/// # Example
/// ```
/// use tdc_compass::reading::read_channel;
/// use tdc_compass::source::{ChannelSource, MemoryFiles};
///
/// let files = MemoryFiles::new();
/// let source = ChannelSource::magnetometer();
/// files.set(&source.data_path, "12.50,7.30,-3.10\n");
///
/// let sample = read_channel(&files, &source).unwrap();
/// assert_eq!(sample.y(), 7.30);
/// ```
pub fn read_channel<F: DeviceFiles>(
    files: &F,
    source: &ChannelSource,
) -> Result<SensorSample, ParseError> {
    read_channel_record(files, source).map(ChannelRecord::into_sample)
}

/// Read one sample from a channel, keeping the text it was parsed from
///
/// An attribute that is readable but not UTF-8 text is a
/// [`ParseError::MalformedRecord`], not an unavailable source.
pub fn read_channel_record<F: DeviceFiles>(
    files: &F,
    source: &ChannelSource,
) -> Result<ChannelRecord, ParseError> {
    let raw = files.read(&source.data_path).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            ParseError::MalformedRecord {
                channel: source.channel,
                record: format!("<{e}>"),
                fields: 0,
            }
        } else {
            ParseError::SourceUnavailable {
                channel: source.channel,
                location: source.data_path.clone(),
                source: e,
            }
        }
    })?;

    parse_channel_record(source.channel, &raw)
}

/// Parse the first record of `text` as an X,Y,Z triple
///
/// Fields are trimmed before parsing. Exactly three fields are required and
/// each must be a finite number.
pub fn parse_record(channel: Channel, text: &str) -> Result<SensorSample, ParseError> {
    parse_channel_record(channel, text).map(ChannelRecord::into_sample)
}

/// [`parse_record`], keeping the record and field text
pub fn parse_channel_record(channel: Channel, text: &str) -> Result<ChannelRecord, ParseError> {
    let record = text.split('\n').next().unwrap_or_default();
    let record = record.strip_suffix('\r').unwrap_or(record);
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();

    let [x, y, z] = fields[..] else {
        return Err(ParseError::MalformedRecord {
            channel,
            record: record.to_owned(),
            fields: fields.len(),
        });
    };

    let values = Vector3::new(
        parse_axis(channel, AXES[0], x)?,
        parse_axis(channel, AXES[1], y)?,
        parse_axis(channel, AXES[2], z)?,
    );

    Ok(ChannelRecord::new(
        SensorSample::new(channel, values),
        record.to_owned(),
        [x.to_owned(), y.to_owned(), z.to_owned()],
    ))
}

fn parse_axis(channel: Channel, axis: char, field: &str) -> Result<f32, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        channel,
        axis,
        field: field.to_owned(),
    };

    let value: f32 = field.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}
