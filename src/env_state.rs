//! # Ephemfeed environment state
//!
//! This module defines [`crate::env_state::EphemEnv`], the **shared environment object** used
//! across the `ephemfeed` library. It provides access to a persistent **HTTP client** used for
//! every Horizons call.
//!
//! ## Overview
//!
//! The main responsibilities of `EphemEnv` are:
//!
//! 1. Manage a global [`ureq::Agent`] HTTP client with sensible default settings
//!    (global timeout, identifying User-Agent).
//! 2. Perform form POST requests with transient-failure retry and exponential backoff,
//!    so the fetch logic above it only ever sees a definitive success or failure.
//!
//! ## Notes
//!
//! - The [`crate::env_state::EphemEnv`] struct is meant to be reused and shared between
//!   different parts of the crate to avoid redundant HTTP session creation.
//! - Requests are strictly sequential: one call is in flight at a time.

use std::{thread, time::Duration};

use ureq::Agent;

use crate::constants::{HTTP_BACKOFF_BASE_S, HTTP_RETRIES, HTTP_TIMEOUT_S, HTTP_USER_AGENT};
use crate::errors::EphemError;

/// Shared environment holding the HTTP client used for all Horizons requests
#[derive(Debug, Clone)]
pub struct EphemEnv {
    pub http_client: Agent,
}

impl Default for EphemEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemEnv {
    /// Create a new environment with a configured HTTP client
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_S)))
            .user_agent(HTTP_USER_AGENT)
            .build();
        EphemEnv {
            http_client: config.into(),
        }
    }

    /// POST a form to `url` and return the response body as text.
    ///
    /// Transient transport failures (connection errors, non-2xx statuses) are retried
    /// up to [`HTTP_RETRIES`] times with exponential backoff before giving up.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the endpoint to POST to
    /// * `form`: the form key/value pairs
    ///
    /// Return
    /// ------
    /// * The response body, or an error once every attempt has failed
    pub(crate) fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String, EphemError> {
        let mut last: Option<ureq::Error> = None;
        for attempt in 0..HTTP_RETRIES {
            if attempt > 0 {
                let pause = HTTP_BACKOFF_BASE_S * f64::powi(2.0, attempt as i32 - 1);
                thread::sleep(Duration::from_secs_f64(pause));
            }
            match self.http_client.post(url).send_form(form.iter().copied()) {
                Ok(mut response) => return Ok(response.body_mut().read_to_string()?),
                Err(err) => last = Some(err),
            }
        }
        Err(EphemError::RetriesExhausted {
            attempts: HTTP_RETRIES,
            last: last.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}
