//! Serialization of finished datasets.
//!
//! The fetch layer hands immutable series and frames to a [`DatasetSink`]; the
//! bundled [`JsonDirSink`] writes them as compact JSON files plus a manifest,
//! each file replaced atomically so a failed run never leaves a half-written
//! dataset behind.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::constants::{
    CENTER, HORIZONS_FILE_API, OUT_UNITS, REF_PLANE, REF_SYSTEM, TIME_TYPE, VEC_TABLE,
};
use crate::datasets::{BodyDef, EncounterWindow};
use crate::errors::EphemError;
use crate::horizons::Signature;
use crate::series::{MultiBodyFrame, VectorSeries};

const SINGLE_SCHEMA: &str = "mcs-ephem-v1";
const MULTI_SCHEMA: &str = "mcs-ephem-multi-v1";
const MANIFEST_SCHEMA: &str = "mcs-ephem-manifest-v1";

/// Receives finished datasets; the fetch layer knows nothing about formats
pub trait DatasetSink {
    /// Emit a validated multi-body frame
    fn write_frame(
        &mut self,
        id: &str,
        frame: &MultiBodyFrame,
        signature: Option<&Signature>,
    ) -> Result<(), EphemError>;

    /// Emit a standalone single-body series, with its window when it is a
    /// high-resolution encounter cut
    fn write_series(
        &mut self,
        id: &str,
        body: &BodyDef,
        window: Option<&EncounterWindow>,
        series: &VectorSeries,
        signature: Option<&Signature>,
    ) -> Result<(), EphemError>;

    /// Called once after the last dataset of a run
    fn finish(&mut self) -> Result<(), EphemError>;
}

#[derive(Debug, Clone, Serialize)]
struct ManifestEntry {
    id: String,
    file: String,
}

/// Writes each dataset under `<out_dir>/ephemeris/<id>.json` and a manifest at
/// `<out_dir>/manifest.json`, atomically (tmp file + rename).
#[derive(Debug)]
pub struct JsonDirSink {
    out_dir: Utf8PathBuf,
    ephem_dir: Utf8PathBuf,
    datasets: Vec<ManifestEntry>,
}

impl JsonDirSink {
    pub fn new(out_dir: impl Into<Utf8PathBuf>) -> Result<Self, EphemError> {
        let out_dir = out_dir.into();
        let ephem_dir = out_dir.join("ephemeris");
        fs::create_dir_all(&ephem_dir)?;
        Ok(JsonDirSink {
            out_dir,
            ephem_dir,
            datasets: Vec::new(),
        })
    }

    fn write_json(&self, path: &Utf8Path, value: &Value) -> Result<(), EphemError> {
        let tmp = path.with_extension("json.tmp");
        let mut payload = serde_json::to_string(value)?;
        payload.push('\n');
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn write_dataset(&mut self, id: &str, value: &Value) -> Result<(), EphemError> {
        let file = format!("{id}.json");
        self.write_json(&self.ephem_dir.join(&file), value)?;
        self.datasets.push(ManifestEntry {
            id: id.to_string(),
            file: format!("ephemeris/{file}"),
        });
        Ok(())
    }
}

fn generated_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn source_value() -> Value {
    json!({ "name": "JPL Horizons", "service": HORIZONS_FILE_API })
}

fn frame_settings_value() -> Value {
    json!({
        "center": CENTER,
        "ref_system": REF_SYSTEM,
        "ref_plane": REF_PLANE,
        "out_units": OUT_UNITS,
        "time_type": TIME_TYPE,
        "vec_table": VEC_TABLE,
    })
}

fn signature_value(signature: Option<&Signature>) -> Value {
    match signature {
        Some(signature) => json!(signature),
        None => json!({}),
    }
}

impl DatasetSink for JsonDirSink {
    fn write_frame(
        &mut self,
        id: &str,
        frame: &MultiBodyFrame,
        signature: Option<&Signature>,
    ) -> Result<(), EphemError> {
        let mut objects = Map::new();
        for body in &frame.bodies {
            objects.insert(
                body.spkid.to_string(),
                json!({ "name": body.name, "pv": body.pv }),
            );
        }
        let value = json!({
            "schema": MULTI_SCHEMA,
            "t_jd": frame.epochs,
            "objects": objects,
            "meta": {
                "generated_at": generated_at(),
                "source": source_value(),
                "frame": frame_settings_value(),
                "signature": signature_value(signature),
            },
        });
        self.write_dataset(id, &value)
    }

    fn write_series(
        &mut self,
        id: &str,
        body: &BodyDef,
        window: Option<&EncounterWindow>,
        series: &VectorSeries,
        signature: Option<&Signature>,
    ) -> Result<(), EphemError> {
        let mut meta = Map::new();
        meta.insert("generated_at".into(), json!(generated_at()));
        meta.insert("source".into(), source_value());
        meta.insert("frame".into(), frame_settings_value());
        meta.insert(
            "object".into(),
            json!({ "name": body.name, "spkid": body.spkid }),
        );
        if let Some(enc) = window {
            meta.insert(
                "window".into(),
                json!({
                    "start_jd": enc.window.start,
                    "stop_jd": enc.window.stop,
                    "step": enc.step.to_string(),
                }),
            );
        }
        meta.insert("signature".into(), signature_value(signature));

        let value = json!({
            "schema": SINGLE_SCHEMA,
            "t_jd": series.epochs,
            "pv": series.pv,
            "meta": meta,
        });
        self.write_dataset(id, &value)
    }

    fn finish(&mut self) -> Result<(), EphemError> {
        let value = json!({
            "schema": MANIFEST_SCHEMA,
            "generated_at": generated_at(),
            "source": source_value(),
            "frame": frame_settings_value(),
            "datasets": self.datasets,
        });
        self.write_json(&self.out_dir.join("manifest.json"), &value)
    }
}
