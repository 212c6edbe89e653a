//! Horizons VECTORS queries and response envelope.
//!
//! One sub-query is a form POST of a `!$$SOF` batch input to the Horizons file
//! API, asking for a JSON envelope. Horizons reports parameter-level problems
//! through the `error` field of that envelope while still answering HTTP 200;
//! the one recoverable case is the *earliest available epoch* message emitted
//! when the requested start predates the object's ephemeris coverage.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CENTER, HORIZONS_FILE_API, OUT_UNITS, REF_PLANE, REF_SYSTEM, SECONDS_PER_DAY, TIME_TYPE,
    VEC_TABLE,
};
use crate::env_state::EphemEnv;
use crate::errors::EphemError;
use crate::time::{jd_from_calendar, Step};

/// JSON envelope of one Horizons response.
///
/// Either `result` holds the text payload with the `$$SOE`/`$$EOE` data block,
/// or `error` carries the service's diagnostic.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub signature: Option<Signature>,
}

/// Service signature echoed by Horizons, kept for dataset provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// The one capability the fetch logic consumes from its environment:
/// a bounded VECTORS sub-query for one body over `[start_jd, stop_jd]`.
pub trait VectorSource {
    fn fetch_vectors(
        &self,
        command: i64,
        start_jd: f64,
        stop_jd: f64,
        step: &Step,
    ) -> Result<RawResponse, EphemError>;
}

/// Live Horizons client backed by the shared HTTP environment
#[derive(Debug, Clone)]
pub struct HorizonsClient {
    env: EphemEnv,
}

impl HorizonsClient {
    pub fn new(env: EphemEnv) -> Self {
        HorizonsClient { env }
    }
}

impl VectorSource for HorizonsClient {
    fn fetch_vectors(
        &self,
        command: i64,
        start_jd: f64,
        stop_jd: f64,
        step: &Step,
    ) -> Result<RawResponse, EphemError> {
        let input = vectors_input(command, start_jd, stop_jd, step);
        let body = self
            .env
            .post_form(HORIZONS_FILE_API, &[("format", "json"), ("input", &input)])?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Build the `!$$SOF` batch input of one VECTORS sub-query.
///
/// Parameter values are quoted the way the official Horizons examples quote them.
/// Epoch bounds are passed as Julian days so the whole pipeline stays on one
/// timestamp representation.
pub(crate) fn vectors_input(command: i64, start_jd: f64, stop_jd: f64, step: &Step) -> String {
    format!(
        "\
!$$SOF
COMMAND='{command}'
OBJ_DATA='NO'
MAKE_EPHEM='YES'
EPHEM_TYPE='VECTORS'
CENTER='{CENTER}'
START_TIME='JD {start_jd:.9}'
STOP_TIME='JD {stop_jd:.9}'
STEP_SIZE='{step}'
REF_SYSTEM='{REF_SYSTEM}'
REF_PLANE='{REF_PLANE}'
OUT_UNITS='{OUT_UNITS}'
VEC_TABLE='{VEC_TABLE}'
CSV_FORMAT='YES'
VEC_LABELS='NO'
VEC_DELTA_T='NO'
VEC_CORR='NONE'
TIME_TYPE='{TIME_TYPE}'
"
    )
}

/// Extract the earliest supported epoch from a Horizons error message.
///
/// Horizons phrases coverage gaps as
/// `... prior to A.D. 1977-AUG-20 14:29:00.0000 UT ...`; the parsed instant is
/// advanced by one second so a re-issued query starts strictly inside the
/// supported range.
///
/// Return
/// ------
/// * The shifted Julian day, or `None` when the message is not a coverage report
pub(crate) fn parse_earliest_epoch(message: &str) -> Option<f64> {
    let earliest_re = Regex::new(
        r"prior to A\.D\. (\d{4})-([A-Z]{3})-(\d{2}) (\d{2}):(\d{2}):(\d{2})(?:\.\d+)? UT",
    )
    .unwrap();

    let caps = earliest_re.captures(message)?;
    let year: i32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let day: u32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps[6].parse().ok()?;

    let jd = jd_from_calendar(year, month, day, hour, minute, second)?;
    Some(jd + 1.0 / SECONDS_PER_DAY)
}

/// Month-abbreviation lookup used only by the coverage-message parser
fn month_number(abbrev: &str) -> Option<u32> {
    let month = match abbrev {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}
