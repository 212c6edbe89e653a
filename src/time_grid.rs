//! Validation of the shared epoch axis across independently fetched series.

use crate::constants::EPOCH_TOLERANCE_JD;
use crate::errors::EphemError;
use crate::series::VectorSeries;

/// Check that every series shares one identical epoch axis.
///
/// The first series supplies the reference axis; every other series must match it
/// in length and pairwise within [`EPOCH_TOLERANCE_JD`]. An empty set is vacuously
/// valid. Length and value mismatches are reported as distinct errors naming the
/// offending body, so a multi-body frame is never assembled from misaligned data.
///
/// Arguments
/// ---------
/// * `series`: `(body name, series)` pairs, reference first
///
/// Return
/// ------
/// * `Ok(())` when all axes agree, otherwise the first mismatch found
pub fn validate_shared_axis<'a, I>(series: I) -> Result<(), EphemError>
where
    I: IntoIterator<Item = (&'a str, &'a VectorSeries)>,
{
    let mut iter = series.into_iter();
    let Some((_, reference)) = iter.next() else {
        return Ok(());
    };

    for (body, candidate) in iter {
        if candidate.epochs.len() != reference.epochs.len() {
            return Err(EphemError::TimeGridLength {
                body: body.to_string(),
                got: candidate.epochs.len(),
                expected: reference.epochs.len(),
            });
        }
        for (index, (&got, &expected)) in
            candidate.epochs.iter().zip(&reference.epochs).enumerate()
        {
            if (got - expected).abs() > EPOCH_TOLERANCE_JD {
                return Err(EphemError::TimeGridEpoch {
                    body: body.to_string(),
                    index,
                    got,
                    expected,
                });
            }
        }
    }
    Ok(())
}
