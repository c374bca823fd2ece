//! Replay a full rotation of magnetometer readings through the poller
//!
//! Run with: `cargo run --example replay`

use std::time::Duration;

use tdc_compass::source::MemoryFiles;
use tdc_compass::{CalibrationProfile, PollSettings, Poller, StopSignal};

const FIELD_STRENGTH: f32 = 40.0; // μT
const STEPS: u64 = 12;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = PollSettings {
        interval: Duration::from_millis(100),
        ..Default::default()
    };

    let files = MemoryFiles::new();
    files.set(&settings.accelerometer.data_path, "0.00,0.00,1.00\n");
    for step in 0..STEPS {
        // replace these with real device lines
        let angle = (step as f32 * 360.0 / STEPS as f32).to_radians();
        let line = format!(
            "{:.2},{:.2},-35.00\n",
            FIELD_STRENGTH * angle.cos(),
            FIELD_STRENGTH * angle.sin()
        );
        files.push_read(&settings.magnetometer.data_path, Ok(line));
    }

    // Small hard-iron offset, as a calibration run might produce
    let profile = CalibrationProfile::new(0.5, -0.25, 1.0, 1.0)?;
    let poller = Poller::new(&files, settings, profile)?;

    poller.run(&StopSignal::new(), Some(STEPS), |report| {
        println!("{report}\n");
    });

    Ok(())
}
