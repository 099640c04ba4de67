use std::collections::HashMap;

use nalgebra::Isometry3;

use crate::camera_rig::common::error::{Result, RigError};

/// Time-indexed coordinate-frame registry contract.
///
/// Resolution fails when no path or no time sample exists; callers decide
/// whether to retain a previous transform.
pub trait FrameGraph {
    /// Rigid transform taking points in `from_frame` to `to_frame` at the
    /// given timestamp.
    fn resolve(&self, from_frame: &str, to_frame: &str, utime: i64) -> Result<Isometry3<f64>>;
}

/// In-memory frame graph with per-pair transform samples.
///
/// Lookup returns the latest sample at or before the query time. Suits fixed
/// rigs, demos, and tests; a live deployment wires the real frame service
/// behind [`FrameGraph`] instead.
#[derive(Debug, Default)]
pub struct FixedFrameGraph {
    samples: HashMap<(String, String), Vec<(i64, Isometry3<f64>)>>,
}

impl FixedFrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a transform sample; samples are kept ordered by timestamp.
    pub fn add_sample(
        &mut self,
        from_frame: impl Into<String>,
        to_frame: impl Into<String>,
        utime: i64,
        transform: Isometry3<f64>,
    ) {
        let series = self
            .samples
            .entry((from_frame.into(), to_frame.into()))
            .or_default();
        let at = series.partition_point(|(t, _)| *t <= utime);
        series.insert(at, (utime, transform));
    }
}

impl FrameGraph for FixedFrameGraph {
    fn resolve(&self, from_frame: &str, to_frame: &str, utime: i64) -> Result<Isometry3<f64>> {
        if from_frame == to_frame {
            return Ok(Isometry3::identity());
        }

        let series = self
            .samples
            .get(&(from_frame.to_string(), to_frame.to_string()))
            .ok_or_else(|| RigError::FrameLookup {
                from: from_frame.to_string(),
                to: to_frame.to_string(),
                utime,
            })?;

        let at = series.partition_point(|(t, _)| *t <= utime);
        if at == 0 {
            return Err(RigError::FrameLookup {
                from: from_frame.to_string(),
                to: to_frame.to_string(),
                utime,
            });
        }
        Ok(series[at - 1].1)
    }
}
