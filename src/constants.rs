//! # Constants and type definitions for Ephemfeed
//!
//! This module centralizes the **service endpoints**, **numeric tolerances**, and
//! **dataset settings** used throughout the `ephemfeed` library.
//!
//! ## Overview
//!
//! - JPL Horizons endpoint and reference-frame settings shared by every request
//! - Epoch comparison tolerance used for stitching and grid validation
//! - Chunking, throttling and transport retry parameters
//! - The tracked solar-system bodies and the Voyager 2 probe identifier
//!
//! These definitions are used by the Horizons query layer, the chunked fetcher
//! and the dataset builders.

// -------------------------------------------------------------------------------------------------
// JPL Horizons service
// -------------------------------------------------------------------------------------------------

/// Batch-file endpoint of the JPL Horizons API
pub const HORIZONS_FILE_API: &str = "https://ssd.jpl.nasa.gov/api/horizons_file.api";

/// User-Agent header sent with every Horizons request
pub const HTTP_USER_AGENT: &str = "MCS-Education-EphemerisBot/1.2 ephemfeed/0.1";

/// Global timeout applied to one HTTP call, in seconds
pub const HTTP_TIMEOUT_S: u64 = 120;

/// Number of attempts for one Horizons call before giving up
pub const HTTP_RETRIES: u32 = 5;

/// Base of the exponential backoff between transport retries, in seconds
pub const HTTP_BACKOFF_BASE_S: f64 = 1.8;

// -------------------------------------------------------------------------------------------------
// Reference frame and output settings (identical for every dataset)
// -------------------------------------------------------------------------------------------------

/// Coordinate center: the solar system barycenter
pub const CENTER: &str = "@0";

/// Reference system of the returned state vectors
pub const REF_SYSTEM: &str = "ICRF";

/// Reference plane of the returned state vectors
pub const REF_PLANE: &str = "FRAME";

/// Output units: astronomical units and days
pub const OUT_UNITS: &str = "AU-D";

/// Horizons vector table type 2: position and velocity
pub const VEC_TABLE: &str = "2";

/// Time scale of the requested epochs
pub const TIME_TYPE: &str = "UT";

// -------------------------------------------------------------------------------------------------
// Numeric tolerances and chunking
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Two epochs closer than this (in Julian days) are considered the same sample
pub const EPOCH_TOLERANCE_JD: f64 = 1e-10;

/// Upper bound on the number of samples Horizons returns for one call
pub const MAX_SAMPLES_PER_CALL: usize = 2000;

/// Politeness delay between successive accepted sub-queries, in milliseconds
pub const CALL_THROTTLE_MS: u64 = 250;

/// Length bound of raw-response excerpts embedded in diagnostics
pub const RESPONSE_EXCERPT_LEN: usize = 1200;

// -------------------------------------------------------------------------------------------------
// Tracked bodies
// -------------------------------------------------------------------------------------------------

/// Sun and the eight planets with their Horizons SPK identifiers
pub const MAJOR_BODIES: [(&str, i64); 9] = [
    ("Sun", 10),
    ("Mercury", 199),
    ("Venus", 299),
    ("Earth", 399),
    ("Mars", 499),
    ("Jupiter", 599),
    ("Saturn", 699),
    ("Uranus", 799),
    ("Neptune", 899),
];

/// Horizons SPK identifier of the Voyager 2 probe
pub const VOYAGER_2_SPKID: i64 = -32;

/// Display name of the Voyager 2 probe
pub const VOYAGER_2_NAME: &str = "Voyager 2";

/// Horizons SPK identifier of the Parker Solar Probe
pub const PARKER_SPKID: i64 = -95;

/// Display name of the Parker Solar Probe
pub const PARKER_NAME: &str = "Parker Solar Probe";
