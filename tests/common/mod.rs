use std::cell::RefCell;
use std::collections::VecDeque;

use ephemfeed::errors::EphemError;
use ephemfeed::horizons::{RawResponse, Signature, VectorSource};
use ephemfeed::time::Step;

/// Serves canned Horizons responses in order and records the requested bounds.
pub struct ScriptedSource {
    responses: RefCell<VecDeque<RawResponse>>,
    calls: RefCell<Vec<(i64, f64, f64)>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<RawResponse>) -> Self {
        ScriptedSource {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(i64, f64, f64)> {
        self.calls.borrow().clone()
    }
}

impl VectorSource for ScriptedSource {
    fn fetch_vectors(
        &self,
        command: i64,
        start_jd: f64,
        stop_jd: f64,
        _step: &Step,
    ) -> Result<RawResponse, EphemError> {
        self.calls.borrow_mut().push((command, start_jd, stop_jd));
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected extra sub-query"))
    }
}

/// Synthesize a VECTORS payload sampled at the given epochs.
pub fn vectors_response(epochs: &[f64]) -> RawResponse {
    let mut result = String::from(
        "API VERSION: 1.2\n*******\nCoordinate center: Solar System Barycenter\n$$SOE\n",
    );
    for &t in epochs {
        result.push_str(&format!(
            "{t:.9}, A.D. 2000-Jan-01 12:00:00.0000, {t:.9}, 0.0, 0.0, 1.0e-2, 2.0e-2, 3.0e-2,\n"
        ));
    }
    result.push_str("$$EOE\n*******\n");
    RawResponse {
        result: Some(result),
        error: None,
        signature: Some(Signature {
            source: Some("NASA/JPL Horizons API".to_string()),
            version: Some("1.2".to_string()),
        }),
    }
}
