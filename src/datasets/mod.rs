//! Dataset builders: one coarse multi-body frame, one finer probe series, and
//! optional high-resolution encounter windows, all fetched strictly in sequence
//! and handed to a [`DatasetSink`].

pub mod sink;

pub use sink::{DatasetSink, JsonDirSink};

use crate::constants::{MAJOR_BODIES, PARKER_NAME, PARKER_SPKID, VOYAGER_2_NAME, VOYAGER_2_SPKID};
use crate::errors::EphemError;
use crate::horizons::{ChunkedFetcher, VectorSource};
use crate::series::{MultiBodyFrame, Window};
use crate::time::{jd_from_calendar, today_00z_jd, Step};

/// One tracked body: display name plus Horizons SPK identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDef {
    pub name: String,
    pub spkid: i64,
}

impl BodyDef {
    pub fn new(name: &str, spkid: i64) -> Self {
        BodyDef {
            name: name.to_string(),
            spkid,
        }
    }
}

/// A named high-resolution window around an encounter, fetched standalone
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterWindow {
    pub id: String,
    pub window: Window,
    pub step: Step,
}

/// Everything one run produces: the coarse multi-body frame, the probe series
/// over the full mission window, and the encounter windows.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionSpec {
    pub probe: BodyDef,
    pub bodies: Vec<BodyDef>,
    pub window: Window,
    pub coarse_step: Step,
    pub probe_step: Step,
    pub coarse_id: String,
    pub probe_id: String,
    pub encounters: Vec<EncounterWindow>,
}

/// Julian day of a calendar instant known to be valid at compile time
fn jd(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> f64 {
    jd_from_calendar(year, month, day, hour, minute, 0).expect("valid calendar date")
}

/// Sun + 8 planets, the coarse frame shared by every mission
fn major_bodies() -> Vec<BodyDef> {
    MAJOR_BODIES
        .iter()
        .map(|&(name, spkid)| BodyDef::new(name, spkid))
        .collect()
}

/// The Voyager 2 mission: Sun + 8 planets every 5 days from launch to today
/// 00:00 UT, the probe daily, and 30-minute windows around the four planetary
/// encounters.
pub fn voyager2_mission() -> MissionSpec {
    let launch = jd(1977, 8, 20, 14, 29);
    let stop = today_00z_jd();

    let encounter = |id: &str, start: f64, stop: f64| EncounterWindow {
        id: id.to_string(),
        window: Window::new(start, stop),
        step: Step::minutes(30),
    };

    MissionSpec {
        probe: BodyDef::new(VOYAGER_2_NAME, VOYAGER_2_SPKID),
        bodies: major_bodies(),
        window: Window::new(launch, stop),
        coarse_step: Step::days(5),
        probe_step: Step::days(1),
        coarse_id: "planets_5d".to_string(),
        probe_id: "voyager2_1d".to_string(),
        encounters: vec![
            encounter(
                "voyager2_jupiter_30m",
                jd(1979, 6, 25, 0, 0),
                jd(1979, 7, 20, 0, 0),
            ),
            encounter(
                "voyager2_saturn_30m",
                jd(1981, 8, 10, 0, 0),
                jd(1981, 9, 5, 0, 0),
            ),
            encounter(
                "voyager2_uranus_30m",
                jd(1986, 1, 10, 0, 0),
                jd(1986, 2, 5, 0, 0),
            ),
            encounter(
                "voyager2_neptune_30m",
                jd(1989, 8, 10, 0, 0),
                jd(1989, 9, 5, 0, 0),
            ),
        ],
    }
}

/// The Parker Solar Probe mission: Sun + 8 planets every 5 days from launch to
/// today 00:00 UT, the probe daily, and 10-minute windows around the first
/// Venus gravity assist and the first perihelion pass.
pub fn parker_mission() -> MissionSpec {
    let launch = jd(2018, 8, 12, 7, 31);
    let stop = today_00z_jd();

    let milestone = |id: &str, start: f64, stop: f64| EncounterWindow {
        id: id.to_string(),
        window: Window::new(start, stop),
        step: Step::minutes(10),
    };

    MissionSpec {
        probe: BodyDef::new(PARKER_NAME, PARKER_SPKID),
        bodies: major_bodies(),
        window: Window::new(launch, stop),
        coarse_step: Step::days(5),
        probe_step: Step::days(1),
        coarse_id: "planets_5d".to_string(),
        probe_id: "parker_solar_probe_1d".to_string(),
        encounters: vec![
            milestone(
                "parker_venus_ga1_10m",
                jd(2018, 10, 2, 0, 0),
                jd(2018, 10, 5, 0, 0),
            ),
            milestone(
                "parker_perihelion1_10m",
                jd(2018, 11, 5, 0, 0),
                jd(2018, 11, 7, 12, 0),
            ),
        ],
    }
}

/// Fetch, validate and emit every dataset of one mission.
///
/// Bodies and windows are processed strictly in sequence; the first fatal
/// condition (sub-query failure, grid mismatch, sink failure) aborts the whole
/// run so no inconsistent dataset is ever committed.
///
/// Arguments
/// ---------
/// * `source`: the Horizons fetch capability
/// * `mission`: what to fetch
/// * `sink`: where finished series and frames are handed over
pub fn build_mission_datasets<S, K>(
    source: &S,
    mission: &MissionSpec,
    sink: &mut K,
) -> Result<(), EphemError>
where
    S: VectorSource,
    K: DatasetSink,
{
    let fetcher = ChunkedFetcher::new(source);

    eprintln!(
        "fetching {} tracked bodies ({} cadence) over JD [{}, {}), a {:.1}-day span",
        mission.bodies.len(),
        mission.coarse_step,
        mission.window.start,
        mission.window.stop,
        mission.window.span(),
    );
    let mut entries = Vec::with_capacity(mission.bodies.len());
    let mut signature = None;
    for body in &mission.bodies {
        eprintln!("  - {} (COMMAND={})", body.name, body.spkid);
        let fetched = fetcher.fetch(body.spkid, mission.window, &mission.coarse_step)?;
        if signature.is_none() {
            signature = fetched.signature;
        }
        entries.push((body.name.clone(), body.spkid, fetched.series));
    }
    let frame = MultiBodyFrame::assemble(entries)?;
    sink.write_frame(&mission.coarse_id, &frame, signature.as_ref())?;

    eprintln!(
        "fetching {} ({} cadence) over JD [{}, {})",
        mission.probe.name, mission.probe_step, mission.window.start, mission.window.stop,
    );
    let fetched = fetcher.fetch(mission.probe.spkid, mission.window, &mission.probe_step)?;
    sink.write_series(
        &mission.probe_id,
        &mission.probe,
        None,
        &fetched.series,
        fetched.signature.as_ref(),
    )?;

    for enc in &mission.encounters {
        eprintln!(
            "fetching {} ({} cadence) over JD [{}, {}), a {:.1}-day span",
            enc.id,
            enc.step,
            enc.window.start,
            enc.window.stop,
            enc.window.span(),
        );
        let fetched = fetcher.fetch(mission.probe.spkid, enc.window, &enc.step)?;
        sink.write_series(
            &enc.id,
            &mission.probe,
            Some(enc),
            &fetched.series,
            fetched.signature.as_ref(),
        )?;
    }

    sink.finish()
}
