//! Parsing of the `$$SOE`/`$$EOE` data block of a Horizons VECTORS response.
//!
//! With `CSV_FORMAT='YES'` and `VEC_LABELS='NO'` each data line is a CSV record
//! of either 8 fields (`JD, calendar, X, Y, Z, VX, VY, VZ`) or, rarely, 7 fields
//! (`JD, X, Y, Z, VX, VY, VZ`), with a trailing separator. Anything that is not a
//! data line (headers, blanks, prose) is skipped silently; a block that yields
//! fewer than two samples is a hard failure.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::constants::RESPONSE_EXCERPT_LEN;
use crate::errors::EphemError;

/// Samples parsed from one sub-query response, not yet stitched into a series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFragment {
    pub epochs: Vec<f64>,
    pub pv: Vec<f64>,
}

/// Locate the text between the `$$SOE` and `$$EOE` markers.
///
/// A response without both markers (in order) almost always means Horizons
/// answered with an error message instead of an ephemeris; the returned error
/// carries a bounded excerpt of the payload for diagnostics.
pub fn extract_data_block(result: &str) -> Result<&str, EphemError> {
    let start = result.find("$$SOE");
    let end = result.find("$$EOE");
    match (start, end) {
        (Some(i0), Some(i1)) if i1 > i0 => Ok(result[i0 + 5..i1].trim()),
        _ => Err(EphemError::MissingDataBlock {
            excerpt: excerpt(result),
        }),
    }
}

/// Parse a data block into packed epoch and component arrays.
///
/// Arguments
/// ---------
/// * `block`: the text between `$$SOE` and `$$EOE`
///
/// Return
/// ------
/// * A fragment with `pv.len() == epochs.len() * 6`, or a fatal error when the
///   block yields fewer than two samples
pub fn parse_vector_block(block: &str) -> Result<SeriesFragment, EphemError> {
    // Only lines opening with a Julian day number are data lines.
    let data: String = block
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());

    let mut epochs = Vec::new();
    let mut pv = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        if let Some((epoch, components)) = parse_sample(&record) {
            epochs.push(epoch);
            pv.extend_from_slice(&components);
        }
    }

    if epochs.len() < 2 {
        return Err(EphemError::InsufficientSamples {
            got: epochs.len(),
            detail: excerpt(block),
        });
    }
    if pv.len() != epochs.len() * 6 {
        return Err(EphemError::ComponentCountMismatch {
            epochs: epochs.len(),
            components: pv.len(),
        });
    }
    Ok(SeriesFragment { epochs, pv })
}

/// Parse one CSV record, dispatching on field count.
///
/// The trailing separator Horizons emits produces an empty last field, which is
/// dropped before dispatch so the 7-field layout is not mistaken for the 8-field
/// one. Records with unparseable numerics are skipped rather than fatal.
fn parse_sample(record: &StringRecord) -> Option<(f64, [f64; 6])> {
    let mut len = record.len();
    if len > 0 && record.get(len - 1)?.is_empty() {
        len -= 1;
    }

    let offset = match len {
        8.. => 2,
        7 => 1,
        _ => return None,
    };

    let epoch: f64 = record.get(0)?.parse().ok()?;
    let mut components = [0.0; 6];
    for (slot, index) in components.iter_mut().zip(offset..offset + 6) {
        *slot = record.get(index)?.parse().ok()?;
    }
    Some((epoch, components))
}

/// Bounded, CR-free excerpt of a raw payload for error messages
pub(crate) fn excerpt(text: &str) -> String {
    let cleaned = text.trim().replace('\r', "");
    match cleaned.char_indices().nth(RESPONSE_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}…", &cleaned[..cut]),
        None => cleaned,
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    const LONG_BLOCK: &str = "\
2459400.032916666, A.D. 2021-Jul-04 12:47:24.0000,  2.195672929244244E-01, -9.108330730147444E-01, -3.948423288985838E-01,  1.551690625465316E-02,  3.431255446589185E-03,  1.487434382568623E-03,
2459401.032916666, A.D. 2021-Jul-05 12:47:24.0000,  2.350485399673041E-01, -9.072153838526355E-01, -3.932752900018191E-01,  1.544428151663651E-02,  3.801751278034243E-03,  1.648076960697150E-03,";

    #[test]
    fn test_extract_data_block() {
        let result = format!(
            "API VERSION: 1.2\n*******\nheader line\n$$SOE\n{LONG_BLOCK}\n$$EOE\n*******\n"
        );
        let block = extract_data_block(&result).unwrap();
        assert!(block.starts_with("2459400.032916666"));
        assert!(block.ends_with(','));
    }

    #[test]
    fn test_extract_data_block_missing_markers() {
        let err = extract_data_block("Horizons error: unknown COMMAND").unwrap_err();
        match err {
            EphemError::MissingDataBlock { excerpt } => {
                assert!(excerpt.contains("unknown COMMAND"));
            }
            other => panic!("expected a missing-block error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_long_layout() {
        let fragment = parse_vector_block(LONG_BLOCK).unwrap();
        assert_eq!(fragment.epochs, vec![2459400.032916666, 2459401.032916666]);
        assert_eq!(fragment.pv.len(), 12);
        assert_eq!(fragment.pv[0], 2.195672929244244E-01);
        assert_eq!(fragment.pv[11], 1.648076960697150E-03);
    }

    #[test]
    fn test_parse_short_layout() {
        let block = "\
100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0,
101.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0,";
        let fragment = parse_vector_block(block).unwrap();
        assert_eq!(fragment.epochs, vec![100.0, 101.0]);
        assert_eq!(fragment.pv[..6], [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(fragment.pv[6..], [7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_non_data_lines_are_skipped() {
        let block = format!(
            "\nCoordinate center: Solar System Barycenter\n\n{LONG_BLOCK}\n> trailing note\n"
        );
        let fragment = parse_vector_block(&block).unwrap();
        assert_eq!(fragment.epochs.len(), 2);
    }

    #[test]
    fn test_unparseable_numerics_are_skipped() {
        let block = format!("100.0, A.D. cal, 1.0, 2.0, not-a-number, 4.0, 5.0, 6.0,\n{LONG_BLOCK}");
        let fragment = parse_vector_block(&block).unwrap();
        assert_eq!(fragment.epochs.len(), 2);
        assert_eq!(fragment.epochs[0], 2459400.032916666);
    }

    #[test]
    fn test_short_records_are_skipped() {
        let block = format!("100.0, 1.0, 2.0,\n{LONG_BLOCK}");
        let fragment = parse_vector_block(&block).unwrap();
        assert_eq!(fragment.epochs.len(), 2);
    }

    #[test]
    fn test_too_few_samples_is_fatal() {
        let err = parse_vector_block(
            "2459400.032916666, A.D. 2021-Jul-04 12:47:24.0000, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0,",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EphemError::InsufficientSamples { got: 1, .. }
        ));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = "x".repeat(5000);
        let short = excerpt(&long);
        assert!(short.chars().count() <= crate::constants::RESPONSE_EXCERPT_LEN + 1);
        assert!(short.ends_with('…'));
    }
}
