//! Device-file capability and channel locations
//!
//! The sensors are exposed as text attributes (sysfs on the TDC-E). All
//! access goes through [`DeviceFiles`] so the pipeline can run against the
//! real filesystem or against [`MemoryFiles`] in tests.
//!
//! # Example
//! ```
//! use tdc_compass::source::{ChannelSource, MemoryFiles, enable_channel};
//!
//! let files = MemoryFiles::new();
//! let magnetometer = ChannelSource::magnetometer();
//! enable_channel(&files, &magnetometer).unwrap();
//!
//! assert_eq!(files.written(&magnetometer.enable_path).as_deref(), Some("1"));
//! ```

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{RecvTimeoutError, bounded};
use log::debug;

use crate::types::Channel;

pub const ACCELEROMETER_DATA_PATH: &str = "/sys/class/misc/FreescaleAccelerometer/data";
pub const ACCELEROMETER_ENABLE_PATH: &str = "/sys/class/misc/FreescaleAccelerometer/enable";
pub const MAGNETOMETER_DATA_PATH: &str = "/sys/class/misc/FreescaleMagnetometer/data";
pub const MAGNETOMETER_ENABLE_PATH: &str = "/sys/class/misc/FreescaleMagnetometer/enable";

/// Value written to an enable attribute to switch the sensor on
pub const ENABLE_VALUE: &str = "1";

/// Text read/write access to device attributes
pub trait DeviceFiles {
    /// Read the full contents at `location`
    fn read(&self, location: &str) -> io::Result<String>;

    /// Write `value` to `location`
    fn write(&self, location: &str, value: &str) -> io::Result<()>;
}

impl<T: DeviceFiles + ?Sized> DeviceFiles for &T {
    fn read(&self, location: &str) -> io::Result<String> {
        (**self).read(location)
    }

    fn write(&self, location: &str, value: &str) -> io::Result<()> {
        (**self).write(location, value)
    }
}

/// Where a channel's data and enable attributes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSource {
    pub channel: Channel,
    pub data_path: String,
    pub enable_path: String,
}

impl ChannelSource {
    pub fn new(
        channel: Channel,
        data_path: impl Into<String>,
        enable_path: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            data_path: data_path.into(),
            enable_path: enable_path.into(),
        }
    }

    /// Freescale accelerometer node
    pub fn accelerometer() -> Self {
        Self::new(
            Channel::Accelerometer,
            ACCELEROMETER_DATA_PATH,
            ACCELEROMETER_ENABLE_PATH,
        )
    }

    /// Freescale magnetometer node
    pub fn magnetometer() -> Self {
        Self::new(
            Channel::Magnetometer,
            MAGNETOMETER_DATA_PATH,
            MAGNETOMETER_ENABLE_PATH,
        )
    }
}

/// Switch a sensor on by writing [`ENABLE_VALUE`] to its enable attribute
pub fn enable_channel<F: DeviceFiles>(files: &F, source: &ChannelSource) -> io::Result<()> {
    debug!("enabling {} via {}", source.channel, source.enable_path);
    files.write(&source.enable_path, ENABLE_VALUE)
}

/// Filesystem-backed device access
///
/// With a read timeout set, each read runs on a helper thread and the
/// caller gives up after the timeout with [`io::ErrorKind::TimedOut`]. A
/// read that never returns leaves its helper thread parked on the file.
#[derive(Debug, Clone, Copy)]
pub struct SysfsFiles {
    read_timeout: Option<Duration>,
}

impl SysfsFiles {
    /// Default bound on a single attribute read
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new() -> Self {
        Self::with_read_timeout(Some(Self::DEFAULT_READ_TIMEOUT))
    }

    /// `None` blocks for as long as the read takes
    pub fn with_read_timeout(read_timeout: Option<Duration>) -> Self {
        Self { read_timeout }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }
}

impl Default for SysfsFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceFiles for SysfsFiles {
    fn read(&self, location: &str) -> io::Result<String> {
        let Some(timeout) = self.read_timeout else {
            return fs::read_to_string(location);
        };

        let (tx, rx) = bounded(1);
        let path = location.to_owned();
        thread::Builder::new()
            .name("sysfs-read".into())
            .spawn(move || {
                // Receiver may already be gone after a timeout
                let _ = tx.send(fs::read_to_string(path));
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("read of {location} exceeded {timeout:?}"),
            )),
            Err(RecvTimeoutError::Disconnected) => {
                Err(io::Error::other(format!("reader for {location} exited")))
            }
        }
    }

    fn write(&self, location: &str, value: &str) -> io::Result<()> {
        fs::write(location, value)
    }
}

#[derive(Debug, Default)]
struct Node {
    queued: VecDeque<io::Result<String>>,
    current: Option<Result<String, io::ErrorKind>>,
    written: Option<String>,
}

/// In-memory device tree
///
/// Each location has a current value returned by every read, plus an
/// optional queue of one-shot results consumed first. Reading a location
/// that was never set fails with [`io::ErrorKind::NotFound`].
#[derive(Debug, Default)]
pub struct MemoryFiles {
    nodes: Mutex<HashMap<String, Node>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value every subsequent read of `location` returns
    pub fn set(&self, location: &str, contents: impl Into<String>) -> &Self {
        self.with_node(location, |node| node.current = Some(Ok(contents.into())));
        self
    }

    /// Make every subsequent read of `location` fail with `kind`
    pub fn fail(&self, location: &str, kind: io::ErrorKind) -> &Self {
        self.with_node(location, |node| node.current = Some(Err(kind)));
        self
    }

    /// Queue one read result ahead of the current value
    pub fn push_read(&self, location: &str, result: io::Result<String>) -> &Self {
        self.with_node(location, |node| node.queued.push_back(result));
        self
    }

    /// Last value written to `location`
    pub fn written(&self, location: &str) -> Option<String> {
        self.nodes
            .lock()
            .ok()?
            .get(location)
            .and_then(|node| node.written.clone())
    }

    fn with_node<R>(&self, location: &str, f: impl FnOnce(&mut Node) -> R) -> R {
        let mut nodes = self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(nodes.entry(location.to_owned()).or_default())
    }
}

impl DeviceFiles for MemoryFiles {
    fn read(&self, location: &str) -> io::Result<String> {
        self.with_node(location, |node| {
            if let Some(result) = node.queued.pop_front() {
                return result;
            }
            match &node.current {
                Some(Ok(contents)) => Ok(contents.clone()),
                Some(Err(kind)) => Err(io::Error::from(*kind)),
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{location} does not exist"),
                )),
            }
        })
    }

    fn write(&self, location: &str, value: &str) -> io::Result<()> {
        self.with_node(location, |node| node.written = Some(value.to_owned()));
        Ok(())
    }
}
