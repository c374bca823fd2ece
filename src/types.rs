//! Core value types for sensor acquisition and heading estimation

use core::fmt;

use nalgebra::Vector3;

use crate::math::{DEG_TO_RAD, normalize_degrees};

/// Physical sensor producing a three-axis sample
///
/// # Example
/// ```
/// use tdc_compass::{Channel, Unit};
///
/// assert_eq!(Channel::Magnetometer.unit(), Unit::MicroTesla);
/// assert_eq!(Channel::Accelerometer.label(), "ACC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Linear acceleration, reported in g
    Accelerometer,
    /// Magnetic field strength, reported in micro-tesla
    Magnetometer,
}

impl Channel {
    /// Unit the channel's axis readings are expressed in
    pub fn unit(self) -> Unit {
        match self {
            Channel::Accelerometer => Unit::GForce,
            Channel::Magnetometer => Unit::MicroTesla,
        }
    }

    /// Capitalised name used when echoing a raw record
    pub fn title(self) -> &'static str {
        match self {
            Channel::Accelerometer => "Accelerometer",
            Channel::Magnetometer => "Magnetometer",
        }
    }

    /// Short prefix used when reporting the channel
    pub fn label(self) -> &'static str {
        match self {
            Channel::Accelerometer => "ACC",
            Channel::Magnetometer => "MAG",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Accelerometer => f.write_str("accelerometer"),
            Channel::Magnetometer => f.write_str("magnetometer"),
        }
    }
}

/// Measurement unit of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Standard gravity (g)
    GForce,
    /// Micro-tesla (μT)
    MicroTesla,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::GForce => "g",
            Unit::MicroTesla => "μT",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One three-axis reading from a single channel
///
/// Samples are produced fresh every poll cycle and never mutated. The
/// fields are private so a sample can only come out of the parser or
/// [`SensorSample::new`].
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use tdc_compass::{Channel, SensorSample};
///
/// let sample = SensorSample::new(Channel::Magnetometer, Vector3::new(12.5, 7.3, -3.1));
/// assert_eq!(sample.x(), 12.5);
/// assert_eq!(sample.unit().symbol(), "μT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    channel: Channel,
    values: Vector3<f32>,
}

impl SensorSample {
    pub fn new(channel: Channel, values: Vector3<f32>) -> Self {
        Self { channel, values }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn unit(&self) -> Unit {
        self.channel.unit()
    }

    /// All three axes as a vector (X, Y, Z)
    pub fn values(&self) -> Vector3<f32> {
        self.values
    }

    pub fn x(&self) -> f32 {
        self.values.x
    }

    pub fn y(&self) -> f32 {
        self.values.y
    }

    pub fn z(&self) -> f32 {
        self.values.z
    }
}

/// A parsed sample together with the device text it came from
///
/// The report echoes the record and prints each axis exactly as the device
/// wrote it, so `"0.10"` stays `"0.10"`. Only [`crate::reading`] builds
/// these.
///
/// # Example
/// ```
/// use tdc_compass::Channel;
/// use tdc_compass::reading::parse_channel_record;
///
/// let record = parse_channel_record(Channel::Accelerometer, "0.10,0.00,1.00\n").unwrap();
/// assert_eq!(record.record(), "0.10,0.00,1.00");
/// assert_eq!(record.fields()[0], "0.10");
/// assert_eq!(record.sample().x(), 0.1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRecord {
    sample: SensorSample,
    record: String,
    fields: [String; 3],
}

impl ChannelRecord {
    pub(crate) fn new(sample: SensorSample, record: String, fields: [String; 3]) -> Self {
        Self {
            sample,
            record,
            fields,
        }
    }

    pub fn sample(&self) -> &SensorSample {
        &self.sample
    }

    pub fn channel(&self) -> Channel {
        self.sample.channel()
    }

    /// First line of the attribute, without its line ending
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Trimmed X, Y and Z field text
    pub fn fields(&self) -> &[String; 3] {
        &self.fields
    }

    pub fn into_sample(self) -> SensorSample {
        self.sample
    }
}

/// Compass heading in degrees, always within `[0, 360)`
///
/// The only way to obtain a `Heading` is through normalisation, so holding
/// one is proof the range invariant holds. `Display` renders two decimal
/// places.
///
/// # Example
/// ```
/// use tdc_compass::Heading;
///
/// let heading = Heading::from_degrees(-90.0);
/// assert_eq!(heading.degrees(), 270.0);
/// assert_eq!(heading.to_string(), "270.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Heading(f32);

impl Heading {
    /// North
    pub const ZERO: Heading = Heading(0.0);

    /// Wraps an arbitrary finite angle into `[0, 360)`
    ///
    /// Non-finite input maps to [`Heading::ZERO`].
    pub fn from_degrees(degrees: f32) -> Self {
        Heading(normalize_degrees(degrees))
    }

    pub fn degrees(self) -> f32 {
        self.0
    }

    pub fn radians(self) -> f32 {
        self.0 * DEG_TO_RAD
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
