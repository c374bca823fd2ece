//! Per-cycle report rendering

use core::fmt;

use crate::types::{ChannelRecord, Heading};

/// Header line between the raw record echo and the axis lines
const DATA_HEADER: &str = "-----------ACC/MAG-DATA-----------";

/// Everything one poll cycle produced
///
/// `Display` renders the console format of the device scripts: the raw
/// first record of each channel, a header, three axis lines per channel
/// with the axis text exactly as read and the channel unit, then the
/// heading to two decimal places.
///
/// ```text
/// Accelerometer data: 0.10,0.00,1.00
/// Magnetometer data: 12.50,7.30,-3.10
///
/// -----------ACC/MAG-DATA-----------
/// ACC X: 0.10g
/// ...
/// MAG Z: -3.10μT
/// Yaw (Compass Heading): 30.28 degrees
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub accelerometer: ChannelRecord,
    pub magnetometer: ChannelRecord,
    pub heading: Heading,
}

impl CycleReport {
    /// Axis lines for one channel, without the heading
    pub fn channel_lines(record: &ChannelRecord) -> [String; 3] {
        let label = record.channel().label();
        let unit = record.channel().unit();
        let [x, y, z] = record.fields();
        [
            format!("{label} X: {x}{unit}"),
            format!("{label} Y: {y}{unit}"),
            format!("{label} Z: {z}{unit}"),
        ]
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = [&self.accelerometer, &self.magnetometer];

        for record in channels {
            writeln!(f, "{} data: {}", record.channel().title(), record.record())?;
        }
        writeln!(f)?;
        writeln!(f, "{DATA_HEADER}")?;
        for record in channels {
            for line in Self::channel_lines(record) {
                writeln!(f, "{line}")?;
            }
        }
        write!(f, "Yaw (Compass Heading): {} degrees", self.heading)
    }
}
