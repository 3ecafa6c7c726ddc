//! Grasp-set files.
//!
//! A grasp set is a JSON document naming the object and listing poses as
//! a quaternion plus a position:
//!
//! ```json
//! {
//!   "object": "mug",
//!   "grasps": [
//!     { "id": 0,
//!       "orientation": { "w": 1.0, "x": 0.0, "y": 0.0, "z": 0.0 },
//!       "position": { "x": 0.1, "y": 0.0, "z": 0.05 } }
//!   ]
//! }
//! ```
//!
//! Files for one object are conventionally named `{object}_*.json` so that
//! [`load_object_grasps`] can gather them from a directory.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use grasp_types::GraspPose;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// Unit quaternion, scalar first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Scalar part.
    pub w: f64,
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

/// Gripper center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

/// One stored grasp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspRecord {
    /// Index within its grasp set.
    pub id: usize,
    /// Gripper orientation.
    pub orientation: Orientation,
    /// Gripper center.
    pub position: Position,
}

impl GraspRecord {
    /// Encode a pose.
    #[must_use]
    pub fn from_pose(id: usize, pose: &GraspPose) -> Self {
        let [px, py, pz, qw, qx, qy, qz] = pose.to_pq_wxyz();
        Self {
            id,
            orientation: Orientation {
                w: qw,
                x: qx,
                y: qy,
                z: qz,
            },
            position: Position {
                x: px,
                y: py,
                z: pz,
            },
        }
    }

    /// Decode to a pose. The quaternion is normalized.
    #[must_use]
    pub fn to_pose(&self) -> GraspPose {
        let (p, q) = (self.position, self.orientation);
        GraspPose::from_pq_wxyz(&[p.x, p.y, p.z, q.w, q.x, q.y, q.z])
    }
}

/// All grasps stored for one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraspFile {
    /// Object identifier.
    pub object: String,
    /// Stored grasps.
    pub grasps: Vec<GraspRecord>,
}

impl GraspFile {
    /// Build a grasp set from poses, numbering them in order.
    #[must_use]
    pub fn from_poses(object: impl Into<String>, poses: &[GraspPose]) -> Self {
        Self {
            object: object.into(),
            grasps: poses
                .iter()
                .enumerate()
                .map(|(id, pose)| GraspRecord::from_pose(id, pose))
                .collect(),
        }
    }

    /// Decode every stored grasp.
    #[must_use]
    pub fn poses(&self) -> Vec<GraspPose> {
        self.grasps.iter().map(GraspRecord::to_pose).collect()
    }

    /// Conventional file name for this object's grasps.
    #[must_use]
    pub fn default_file_name(&self) -> String {
        format!("{}_grasps.json", self.object)
    }
}

/// Write a grasp set as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_grasps<P: AsRef<Path>>(grasps: &GraspFile, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, grasps)?;
    writeln!(writer)?;
    writer.flush()?;
    info!(
        path = %path.display(),
        object = %grasps.object,
        count = grasps.grasps.len(),
        "Saved grasps"
    );
    Ok(())
}

/// Read a grasp set.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a valid grasp set.
pub fn load_grasps<P: AsRef<Path>>(path: P) -> IoResult<GraspFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    let grasps: GraspFile = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), count = grasps.grasps.len(), "Loaded grasps");
    Ok(grasps)
}

/// Gather every grasp file for `object_id` in `dir`.
///
/// Files whose names start with `{object_id}_` are read in lexicographic
/// name order and concatenated; ids are renumbered in that order. Returns
/// `Ok(None)` when no file matches.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a matching file
/// fails to load.
pub fn load_object_grasps<P: AsRef<Path>>(
    dir: P,
    object_id: &str,
) -> IoResult<Option<GraspFile>> {
    let dir = dir.as_ref();
    let prefix = format!("{object_id}_");

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| IoError::open(dir, e))? {
        let entry = entry?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(&prefix));
        if matches && entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    if paths.is_empty() {
        return Ok(None);
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut merged = GraspFile {
        object: object_id.to_string(),
        grasps: Vec::new(),
    };
    for path in &paths {
        let file = load_grasps(path)?;
        merged.grasps.extend(file.grasps);
    }
    for (id, record) in merged.grasps.iter_mut().enumerate() {
        record.id = id;
    }

    info!(
        object = object_id,
        files = paths.len(),
        count = merged.grasps.len(),
        "Merged object grasps"
    );
    Ok(Some(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::{Matrix3, UnitQuaternion, Vector3};

    #[test]
    fn record_round_trips_pose() {
        let rot = UnitQuaternion::from_euler_angles(0.2, 0.4, -0.9)
            .to_rotation_matrix()
            .into_inner();
        let pose = GraspPose::from_parts(rot, Vector3::new(0.1, 0.2, 0.3));
        let record = GraspRecord::from_pose(4, &pose);
        assert_eq!(record.id, 4);
        assert_relative_eq!(record.to_pose().matrix(), pose.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn json_layout_matches_documented_shape() {
        let pose = GraspPose::from_parts(Matrix3::identity(), Vector3::new(1.0, 2.0, 3.0));
        let file = GraspFile::from_poses("cube", &[pose]);
        let value = serde_json::to_value(&file).expect("serialize");

        assert_eq!(value["object"], "cube");
        assert_eq!(value["grasps"][0]["id"], 0);
        assert_eq!(value["grasps"][0]["orientation"]["w"], 1.0);
        assert_eq!(value["grasps"][0]["position"]["z"], 3.0);
        assert_eq!(file.default_file_name(), "cube_grasps.json");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = serde_json::from_str::<GraspFile>(r#"{"object": "x"}"#).expect_err("missing");
        assert!(IoError::from(err).to_string().contains("JSON"));
    }
}
