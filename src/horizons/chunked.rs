//! Chunked retrieval of long vector series.
//!
//! Horizons caps the number of samples returned per call, so a long window is
//! walked in bounded sub-queries whose fragments are stitched into one gap-free,
//! duplicate-free series. The walk is an explicit state machine:
//!
//! ```text
//! Fetching ──fragment──▶ Fetching ──cursor ≥ stop──▶ Done
//!    │ └──earliest-available──▶ Shifting ──new start──▶ Fetching
//!    └──────────any other error──────────▶ Failed ◀── unsatisfiable shift
//! ```
//!
//! A sub-query never unwinds: its outcome is a tagged result consumed by the
//! machine. Either the whole requested window is covered or the
//! fetch fails; a partial series is never returned.

use std::{thread, time::Duration};

use crate::constants::{CALL_THROTTLE_MS, EPOCH_TOLERANCE_JD, MAX_SAMPLES_PER_CALL};
use crate::errors::EphemError;
use crate::horizons::query::{Signature, VectorSource};
use crate::horizons::vector_parser::{extract_data_block, parse_vector_block, SeriesFragment};
use crate::series::{VectorSeries, Window};
use crate::time::Step;

/// A stitched series together with the service signature of its first sub-query
#[derive(Debug, Clone)]
pub struct FetchedSeries {
    pub series: VectorSeries,
    pub signature: Option<Signature>,
}

/// Outcome of one bounded sub-query
enum SubQueryOutcome {
    /// Samples parsed from an accepted response
    Fetched(SeriesFragment, Option<Signature>),
    /// The service has no data before this epoch; restart the sub-query there
    NeedsShift(f64),
    /// Unrecoverable; aborts the whole fetch
    Fatal(EphemError),
}

enum FetchState {
    Fetching,
    Shifting(f64),
    Done,
    Failed(EphemError),
}

/// Walks a window in bounded sub-queries against a [`VectorSource`] and stitches
/// the fragments into one series.
pub struct ChunkedFetcher<'a, S: VectorSource> {
    source: &'a S,
    max_samples_per_call: usize,
    throttle: Duration,
}

impl<'a, S: VectorSource> ChunkedFetcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        ChunkedFetcher {
            source,
            max_samples_per_call: MAX_SAMPLES_PER_CALL,
            throttle: Duration::from_millis(CALL_THROTTLE_MS),
        }
    }

    /// Lower the per-call sample cap (the service limit is the default)
    pub fn with_max_samples_per_call(mut self, cap: usize) -> Self {
        self.max_samples_per_call = cap;
        self
    }

    /// Change the politeness delay between accepted sub-queries
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Fetch the whole `window` for one body at the given cadence.
    ///
    /// Arguments
    /// ---------
    /// * `command`: the Horizons SPK identifier of the body
    /// * `window`: the half-open epoch range `[start, stop)` to cover
    /// * `step`: the sampling cadence
    ///
    /// Return
    /// ------
    /// * The stitched series (strictly increasing epochs, no boundary duplicates,
    ///   at least two samples), or the first fatal error encountered
    pub fn fetch(
        &self,
        command: i64,
        window: Window,
        step: &Step,
    ) -> Result<FetchedSeries, EphemError> {
        let chunk_span = step.span_days() * (self.max_samples_per_call - 1) as f64;
        let mut cursor = window.start;
        let mut epochs: Vec<f64> = Vec::new();
        let mut pv: Vec<f64> = Vec::new();
        let mut signature = None;
        let mut state = FetchState::Fetching;

        loop {
            state = match state {
                FetchState::Fetching => {
                    if cursor >= window.stop {
                        FetchState::Done
                    } else {
                        let chunk_stop = (cursor + chunk_span).min(window.stop);
                        if chunk_stop <= cursor {
                            // zero-length chunk cannot make progress
                            FetchState::Done
                        } else {
                            match self.sub_query(command, cursor, chunk_stop, step) {
                                SubQueryOutcome::Fetched(fragment, sig) => {
                                    if signature.is_none() {
                                        signature = sig;
                                    }
                                    append_fragment(&mut epochs, &mut pv, fragment);
                                    cursor = chunk_stop;
                                    if cursor < window.stop && !self.throttle.is_zero() {
                                        thread::sleep(self.throttle);
                                    }
                                    FetchState::Fetching
                                }
                                SubQueryOutcome::NeedsShift(earliest) => {
                                    FetchState::Shifting(earliest)
                                }
                                SubQueryOutcome::Fatal(err) => FetchState::Failed(err),
                            }
                        }
                    }
                }
                FetchState::Shifting(earliest) => {
                    if earliest >= window.stop {
                        FetchState::Failed(EphemError::UnsatisfiableWindow {
                            command,
                            earliest,
                            stop: window.stop,
                        })
                    } else if earliest <= cursor {
                        // the reported bound must advance the cursor, or the walk would never end
                        FetchState::Failed(EphemError::HorizonsApi {
                            command,
                            message: format!(
                                "earliest available epoch JD {earliest} does not advance the \
                                 window start JD {cursor}"
                            ),
                        })
                    } else {
                        cursor = earliest;
                        FetchState::Fetching
                    }
                }
                FetchState::Done => {
                    if epochs.len() < 2 {
                        return Err(EphemError::InsufficientSamples {
                            got: epochs.len(),
                            detail: format!(
                                "stitched series for COMMAND={command} over JD [{}, {})",
                                window.start, window.stop
                            ),
                        });
                    }
                    if pv.len() != epochs.len() * 6 {
                        return Err(EphemError::ComponentCountMismatch {
                            epochs: epochs.len(),
                            components: pv.len(),
                        });
                    }
                    return Ok(FetchedSeries {
                        series: VectorSeries { epochs, pv },
                        signature,
                    });
                }
                FetchState::Failed(err) => return Err(err),
            };
        }
    }

    /// Issue one bounded sub-query and classify its response
    fn sub_query(
        &self,
        command: i64,
        start_jd: f64,
        stop_jd: f64,
        step: &Step,
    ) -> SubQueryOutcome {
        let response = match self.source.fetch_vectors(command, start_jd, stop_jd, step) {
            Ok(response) => response,
            Err(err) => return SubQueryOutcome::Fatal(err),
        };

        if let Some(message) = response.error.filter(|m| !m.is_empty()) {
            return match super::query::parse_earliest_epoch(&message) {
                Some(earliest) => SubQueryOutcome::NeedsShift(earliest),
                None => SubQueryOutcome::Fatal(EphemError::HorizonsApi { command, message }),
            };
        }

        let Some(result) = response.result else {
            return SubQueryOutcome::Fatal(EphemError::MissingResult { command });
        };

        match extract_data_block(&result).and_then(parse_vector_block) {
            Ok(fragment) => SubQueryOutcome::Fetched(fragment, response.signature),
            Err(err) => SubQueryOutcome::Fatal(err),
        }
    }
}

/// Append a fragment to the accumulated series, dropping the boundary overlap.
///
/// Horizons repeats the chunk-boundary sample at the start of the next chunk, and
/// independent calls are not guaranteed to reproduce it bit-identically, so the
/// cut point is the first epoch strictly past the last accepted one by more than
/// [`EPOCH_TOLERANCE_JD`].
fn append_fragment(epochs: &mut Vec<f64>, pv: &mut Vec<f64>, fragment: SeriesFragment) {
    match epochs.last().copied() {
        None => {
            *epochs = fragment.epochs;
            *pv = fragment.pv;
        }
        Some(last) => {
            let keep = fragment
                .epochs
                .iter()
                .position(|&t| t > last + EPOCH_TOLERANCE_JD)
                .unwrap_or(fragment.epochs.len());
            epochs.extend_from_slice(&fragment.epochs[keep..]);
            pv.extend_from_slice(&fragment.pv[keep * 6..]);
        }
    }
}
