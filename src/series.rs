//! In-memory shapes produced by the fetch layer: single-body vector series,
//! half-open fetch windows, and the validated multi-body frame.

use nalgebra::Vector3;
use serde::Serialize;

use crate::errors::EphemError;
use crate::time_grid::validate_shared_axis;

/// Half-open time range `[start, stop)` of a fetch, in Julian days
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: f64,
    pub stop: f64,
}

impl Window {
    pub fn new(start: f64, stop: f64) -> Self {
        Window { start, stop }
    }

    /// Length of the window in Julian days
    pub fn span(&self) -> f64 {
        self.stop - self.start
    }
}

/// One position/velocity sample of a body
///
/// Positions are in AU, velocities in AU/day, both barycentric ICRF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub epoch: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Ordered, duplicate-free series of state vectors for one body.
///
/// `epochs` holds the Julian day of each sample in strictly increasing order and
/// `pv` the flattened `[x, y, z, vx, vy, vz]` components, so that
/// `pv.len() == epochs.len() * 6` always holds for a finished series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorSeries {
    pub epochs: Vec<f64>,
    pub pv: Vec<f64>,
}

impl VectorSeries {
    /// Number of samples in the series
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn first_epoch(&self) -> Option<f64> {
        self.epochs.first().copied()
    }

    pub fn last_epoch(&self) -> Option<f64> {
        self.epochs.last().copied()
    }

    /// State vector at sample `index`, or `None` past the end
    pub fn sample(&self, index: usize) -> Option<StateVector> {
        let epoch = *self.epochs.get(index)?;
        let pv = self.pv.get(index * 6..index * 6 + 6)?;
        Some(StateVector {
            epoch,
            position: Vector3::new(pv[0], pv[1], pv[2]),
            velocity: Vector3::new(pv[3], pv[4], pv[5]),
        })
    }
}

/// Flattened state vectors of one body inside a [`MultiBodyFrame`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodySeries {
    pub name: String,
    pub spkid: i64,
    pub pv: Vec<f64>,
}

/// Several bodies sampled on one identical epoch axis.
///
/// A frame is only ever constructed through [`MultiBodyFrame::assemble`], which
/// refuses to merge series whose epoch axes differ. It is never mutated afterwards,
/// only serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiBodyFrame {
    pub epochs: Vec<f64>,
    pub bodies: Vec<BodySeries>,
}

impl MultiBodyFrame {
    /// Merge independently fetched per-body series into one frame.
    ///
    /// Arguments
    /// ---------
    /// * `entries`: `(name, spkid, series)` per body, in presentation order
    ///
    /// Return
    /// ------
    /// * The assembled frame, or a time-grid error naming the first misaligned body
    pub fn assemble(entries: Vec<(String, i64, VectorSeries)>) -> Result<Self, EphemError> {
        validate_shared_axis(entries.iter().map(|(name, _, series)| (name.as_str(), series)))?;

        let epochs = entries
            .first()
            .map(|(_, _, series)| series.epochs.clone())
            .unwrap_or_default();
        let bodies = entries
            .into_iter()
            .map(|(name, spkid, series)| BodySeries {
                name,
                spkid,
                pv: series.pv,
            })
            .collect();
        Ok(MultiBodyFrame { epochs, bodies })
    }
}
