use std::process::ExitCode;

use log::{error, info, warn};
use tdc_compass::source::enable_channel;
use tdc_compass::{CalibrationProfile, Error, PollSettings, Poller, StopSignal};

const ENV_MAX_CYCLES: &str = "TDC_MAX_CYCLES";
const ENV_CALIBRATION: &str = "TDC_CALIBRATION";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("not starting: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let settings = PollSettings::from_env()?;
    let profile = match std::env::var(ENV_CALIBRATION) {
        Ok(path) => CalibrationProfile::from_csv_path(&path)?,
        Err(_) => CalibrationProfile::identity(),
    };
    let max_cycles = match std::env::var(ENV_MAX_CYCLES) {
        Ok(value) => Some(value.trim().parse::<u64>().map_err(|_| Error::InvalidSetting {
            name: ENV_MAX_CYCLES,
            value,
        })?),
        Err(_) => None,
    };

    info!(
        "calibration: offset ({}, {}), scale ({}, {})",
        profile.offset_x(),
        profile.offset_y(),
        profile.scale_x(),
        profile.scale_y()
    );

    let files = settings.sysfs_files();
    for source in [&settings.accelerometer, &settings.magnetometer] {
        if let Err(e) = enable_channel(&files, source) {
            warn!("could not enable {} at {}: {}", source.channel, source.enable_path, e);
        }
    }

    let poller = Poller::new(files, settings, profile)?;

    let stop = StopSignal::new();
    if let Err(e) = stop.stop_on_termination() {
        warn!("{e}; only {ENV_MAX_CYCLES} or a kill will end polling");
    }

    poller.run(&stop, max_cycles, |report| {
        println!("{report}");
        println!();
    });

    Ok(())
}
