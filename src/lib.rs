//! TDC Compass - accelerometer/magnetometer acquisition and compass heading
//!
//! Reads three-axis samples from text device attributes (the Freescale
//! accelerometer and magnetometer nodes under `/sys/class/misc` on a TDC-E),
//! applies a magnetometer calibration and computes a flat compass heading in
//! `[0, 360)` degrees.
//!
//! # Pipeline
//!
//! - [`reading`]: read a channel attribute and parse its first `X,Y,Z` record
//! - [`calibration`]: per-axis offset and scale on the magnetometer X/Y plane
//! - [`compass`]: four-quadrant arctangent, normalised to `[0, 360)`
//! - [`poller`]: fixed-interval loop with a cooperative [`StopSignal`]
//!
//! Device access goes through the [`DeviceFiles`](source::DeviceFiles)
//! trait, so everything above runs unchanged against
//! [`MemoryFiles`](source::MemoryFiles).
//!
//! # Quick Start
//!
//! ```rust
//! use tdc_compass::{CalibrationProfile, Channel, compute_heading, apply_calibration};
//! use tdc_compass::reading::parse_record;
//!
//! let profile = CalibrationProfile::identity();
//! let sample = parse_record(Channel::Magnetometer, "12.50,7.30,-3.10\n").unwrap();
//!
//! let calibrated = apply_calibration(&profile, &sample);
//! let heading = compute_heading(calibrated.x, calibrated.y);
//!
//! assert_eq!(format!("{heading}"), "30.28");
//! ```

pub mod calibration;
pub mod compass;
mod error;
mod math;
pub mod poller;
pub mod reading;
mod report;
pub mod source;
mod types;

pub use calibration::{CalibrationProfile, apply_calibration};
pub use compass::compute_heading;
pub use error::{Error, ParseError, Result};
pub use math::{DEG_TO_RAD, RAD_TO_DEG, normalize_degrees};
pub use poller::{PollSettings, Poller, RunSummary, StopSignal};
pub use reading::{parse_channel_record, parse_record, read_channel, read_channel_record};
pub use report::CycleReport;
pub use types::*;
