//! Fixed-interval polling driver
//!
//! One cycle reads the accelerometer and the magnetometer, computes the
//! heading and hands a [`CycleReport`] to the caller. Cycle faults are
//! logged and skipped; the loop ends on a [`StopSignal`] or after a cycle
//! limit.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use tdc_compass::{CalibrationProfile, PollSettings, Poller, StopSignal};
//! use tdc_compass::source::MemoryFiles;
//!
//! let settings = PollSettings {
//!     interval: Duration::from_millis(1),
//!     ..Default::default()
//! };
//! let files = MemoryFiles::new();
//! files.set(&settings.accelerometer.data_path, "0.00,0.00,1.00\n");
//! files.set(&settings.magnetometer.data_path, "0.0,25.0,-40.0\n");
//!
//! let poller = Poller::new(&files, settings, CalibrationProfile::identity()).unwrap();
//! let summary = poller.run(&StopSignal::new(), Some(3), |report| {
//!     assert_eq!(report.heading.to_string(), "90.00");
//! });
//! assert_eq!(summary.reports, 3);
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, bounded};
use log::{debug, info, warn};

use crate::calibration::CalibrationProfile;
use crate::error::{Error, ParseError, Result};
use crate::reading::read_channel_record;
use crate::report::CycleReport;
use crate::source::{ChannelSource, DeviceFiles, SysfsFiles};
use crate::types::Heading;

pub const ENV_ACC_PATH: &str = "TDC_ACC_PATH";
pub const ENV_MAG_PATH: &str = "TDC_MAG_PATH";
pub const ENV_ACC_ENABLE_PATH: &str = "TDC_ACC_ENABLE_PATH";
pub const ENV_MAG_ENABLE_PATH: &str = "TDC_MAG_ENABLE_PATH";
pub const ENV_POLL_INTERVAL_MS: &str = "TDC_POLL_INTERVAL_MS";
pub const ENV_READ_TIMEOUT_MS: &str = "TDC_READ_TIMEOUT_MS";

/// Polling configuration
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tdc_compass::PollSettings;
///
/// let settings = PollSettings {
///     interval: Duration::from_secs(1),
///     read_timeout: None, // wait as long as each read takes
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub accelerometer: ChannelSource,
    pub magnetometer: ChannelSource,
    /// Sleep between cycles, must be non-zero
    pub interval: Duration,
    /// Bound on each attribute read, `None` to wait indefinitely
    pub read_timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            accelerometer: ChannelSource::accelerometer(),
            magnetometer: ChannelSource::magnetometer(),
            interval: Duration::from_secs(5),
            read_timeout: Some(SysfsFiles::DEFAULT_READ_TIMEOUT),
        }
    }
}

impl PollSettings {
    /// Defaults overlaid with `TDC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns per variable name
    ///
    /// An overridden data path without an explicit enable path gets the
    /// `enable` attribute next to it, so pointing the poller at another
    /// device never switches on the default one.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        overlay_source(
            &mut settings.accelerometer,
            lookup(ENV_ACC_PATH),
            lookup(ENV_ACC_ENABLE_PATH),
        );
        overlay_source(
            &mut settings.magnetometer,
            lookup(ENV_MAG_PATH),
            lookup(ENV_MAG_ENABLE_PATH),
        );
        if let Some(ms) = lookup(ENV_POLL_INTERVAL_MS) {
            settings.interval = Duration::from_millis(parse_millis(ENV_POLL_INTERVAL_MS, &ms)?);
        }
        if let Some(ms) = lookup(ENV_READ_TIMEOUT_MS) {
            settings.read_timeout = match parse_millis(ENV_READ_TIMEOUT_MS, &ms)? {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            };
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::InvalidSetting {
                name: ENV_POLL_INTERVAL_MS,
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Filesystem access bounded by this configuration's read timeout
    pub fn sysfs_files(&self) -> SysfsFiles {
        SysfsFiles::with_read_timeout(self.read_timeout)
    }
}

fn overlay_source(source: &mut ChannelSource, data: Option<String>, enable: Option<String>) {
    if let Some(path) = data {
        source.enable_path = sibling_enable_path(&path);
        source.data_path = path;
    }
    if let Some(path) = enable {
        source.enable_path = path;
    }
}

fn sibling_enable_path(data_path: &str) -> String {
    Path::new(data_path)
        .with_file_name("enable")
        .to_string_lossy()
        .into_owned()
}

fn parse_millis(name: &'static str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| Error::InvalidSetting {
        name,
        value: value.to_owned(),
    })
}

/// Cooperative stop request shared between the loop and its owner
///
/// Clones share state. Once stopped, a signal stays stopped.
#[derive(Debug, Clone)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Request a stop, waking any pending [`wait`](Self::wait)
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let _ = self.tx.try_send(());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Stop on SIGINT, and on SIGTERM/SIGHUP where the platform has them
    ///
    /// The handler is process-wide and can be installed once; a second
    /// call fails with [`Error::SignalHandler`].
    pub fn stop_on_termination(&self) -> Result<()> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            debug!("termination requested");
            signal.stop();
        })?;
        Ok(())
    }

    /// Sleep for `timeout` or until stopped; returns true when stopped
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        if self.rx.recv_timeout(timeout).is_ok() {
            // Pass the wake-up on to other waiters
            let _ = self.tx.try_send(());
        }
        self.is_stopped()
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles attempted
    pub cycles: u64,
    /// Cycles that produced a report
    pub reports: u64,
    /// Cycles skipped because of a read or parse fault
    pub faults: u64,
}

/// Polling driver over a device-file capability
pub struct Poller<F> {
    files: F,
    settings: PollSettings,
    profile: CalibrationProfile,
}

impl<F: DeviceFiles> Poller<F> {
    /// Fails with a startup fault if the settings are unusable
    pub fn new(files: F, settings: PollSettings, profile: CalibrationProfile) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            files,
            settings,
            profile,
        })
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Run a single acquisition cycle
    pub fn poll_once(&self) -> Result<CycleReport, ParseError> {
        let accelerometer = read_channel_record(&self.files, &self.settings.accelerometer)?;
        let magnetometer = read_channel_record(&self.files, &self.settings.magnetometer)?;
        let heading = Heading::from_magnetometer(&self.profile, magnetometer.sample());

        Ok(CycleReport {
            accelerometer,
            magnetometer,
            heading,
        })
    }

    /// Poll until `stop` fires or `max_cycles` cycles have run
    ///
    /// `on_report` sees every successful cycle. There is no sleep after the
    /// final cycle of a bounded run.
    pub fn run<R>(&self, stop: &StopSignal, max_cycles: Option<u64>, mut on_report: R) -> RunSummary
    where
        R: FnMut(&CycleReport),
    {
        let mut summary = RunSummary::default();
        let limit_reached = |summary: &RunSummary| max_cycles.is_some_and(|max| summary.cycles >= max);

        info!(
            "polling {} and {} every {:?}",
            self.settings.accelerometer.data_path,
            self.settings.magnetometer.data_path,
            self.settings.interval
        );

        while !stop.is_stopped() && !limit_reached(&summary) {
            summary.cycles += 1;

            match self.poll_once() {
                Ok(report) => {
                    debug!("cycle {}: heading {}", summary.cycles, report.heading);
                    summary.reports += 1;
                    on_report(&report);
                }
                Err(e) => {
                    warn!("cycle {} skipped: {}", summary.cycles, e);
                    summary.faults += 1;
                }
            }

            if limit_reached(&summary) || stop.wait(self.settings.interval) {
                break;
            }
        }

        info!(
            "polling finished after {} cycles ({} reports, {} faults)",
            summary.cycles, summary.reports, summary.faults
        );
        summary
    }
}
