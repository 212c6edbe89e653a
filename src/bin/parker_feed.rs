//! Generate the Parker Solar Probe ephemeris datasets from JPL Horizons.
//!
//! Usage: `parker_feed [output_dir]` (defaults to `output/parker_solar_probe`).

use ephemfeed::datasets::{build_mission_datasets, parker_mission, JsonDirSink};
use ephemfeed::env_state::EphemEnv;
use ephemfeed::errors::EphemError;
use ephemfeed::horizons::HorizonsClient;

fn run() -> Result<(), EphemError> {
    let out_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "output/parker_solar_probe".to_string());

    let client = HorizonsClient::new(EphemEnv::new());
    let mission = parker_mission();
    let mut sink = JsonDirSink::new(out_dir.as_str())?;
    build_mission_datasets(&client, &mission, &mut sink)?;

    eprintln!("done, wrote {out_dir}/manifest.json");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR: ephemeris generation failed.");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
