// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Posture classifiers.
//!
//! A [`PostureClassifier`] turns one frame's [`FrameBatch`] into a
//! [`ResultVector`] with one flag per detection. The only implementation is
//! [`WheelchairClassifier`], which flags a person as seated in a wheelchair
//! when both the knees and the hips are bent inside a fixed angle band.
//!
//! # Example
//!
//! ```rust
//! use wheelchair_sentinel::{FrameBatch, PostureClassifier, WheelchairClassifier};
//!
//! let classifier = WheelchairClassifier::default();
//! let results = classifier.process(&FrameBatch::default())?;
//! assert!(results.is_empty());
//! # Ok::<(), wheelchair_sentinel::SentinelError>(())
//! ```

use crate::batch::{BoundingBox, FrameBatch, check_lengths};
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::geometry::get_angle;
use crate::keypoints::{KeypointIndex, KeypointScores, PoseKeypoints, point_or_origin};
use crate::results::ResultVector;

/// Capability shared by all per-frame posture detectors.
pub trait PostureClassifier {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Classify every detection of one frame.
    ///
    /// The result has one entry per detection, in batch order.
    ///
    /// # Errors
    ///
    /// Implementations return an error only for a malformed batch, never for
    /// degenerate geometry of a single detection.
    fn process(&self, batch: &FrameBatch) -> Result<ResultVector>;
}

/// The four joint angles used by [`WheelchairClassifier`], in degrees.
///
/// `None` marks an angle that touches an absent keypoint when absent
/// keypoints are not substituted by the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointAngles {
    pub left_knee: Option<f32>,
    pub right_knee: Option<f32>,
    pub left_hip: Option<f32>,
    pub right_hip: Option<f32>,
}

impl JointAngles {
    /// Measure the knee and hip angles of one detection.
    ///
    /// Knee angles use hip, knee, ankle with the knee as vertex. Hip angles use
    /// shoulder, hip, knee with the hip as vertex.
    #[must_use]
    pub fn measure(keypoints: &PoseKeypoints, absent_as_origin: bool) -> Self {
        use KeypointIndex::{
            LeftAnkle, LeftHip, LeftKnee, LeftShoulder, RightAnkle, RightHip, RightKnee,
            RightShoulder,
        };

        let angle = |a: KeypointIndex, vertex: KeypointIndex, c: KeypointIndex| {
            let fetch = |k: KeypointIndex| {
                if absent_as_origin {
                    Some(point_or_origin(keypoints, k))
                } else {
                    keypoints[k.index()]
                }
            };
            Some(get_angle(fetch(a)?, fetch(vertex)?, fetch(c)?))
        };

        Self {
            left_knee: angle(LeftHip, LeftKnee, LeftAnkle),
            right_knee: angle(RightHip, RightKnee, RightAnkle),
            left_hip: angle(LeftShoulder, LeftHip, LeftKnee),
            right_hip: angle(RightShoulder, RightHip, RightKnee),
        }
    }
}

/// Classifies a person as seated in a wheelchair from knee and hip angles.
#[derive(Debug, Clone, Default)]
pub struct WheelchairClassifier {
    config: ClassifierConfig,
}

impl WheelchairClassifier {
    /// Create a classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured band is invalid.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Whether the knees are bent.
    #[must_use]
    pub fn knee_bent(&self, angles: &JointAngles) -> bool {
        self.config.mode.band(
            angles.left_knee,
            angles.right_knee,
            self.config.lower_bound,
            self.config.upper_bound,
        )
    }

    /// Whether the hips are bent.
    #[must_use]
    pub fn hip_bent(&self, angles: &JointAngles) -> bool {
        self.config.mode.band(
            angles.left_hip,
            angles.right_hip,
            self.config.lower_bound,
            self.config.upper_bound,
        )
    }

    /// Classify one set of keypoints.
    #[must_use]
    pub fn classify(&self, keypoints: &PoseKeypoints) -> bool {
        let angles = JointAngles::measure(keypoints, self.config.absent_as_origin);
        self.knee_bent(&angles) && self.hip_bent(&angles)
    }

    /// Classify from the four parallel sequences of a frame.
    ///
    /// Ids, boxes and scores are part of the batch contract but do not affect the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SentinelError::InvalidBatchShape`] if the sequences differ in length.
    pub fn process_parts(
        &self,
        ids: &[u64],
        boxes: &[BoundingBox],
        keypoints: &[PoseKeypoints],
        scores: &[KeypointScores],
    ) -> Result<ResultVector> {
        check_lengths(ids.len(), boxes.len(), keypoints.len(), scores.len())?;
        Ok(self.classify_all(keypoints))
    }

    fn classify_all(&self, keypoints: &[PoseKeypoints]) -> ResultVector {
        keypoints
            .iter()
            .map(|kps| self.classify(kps))
            .collect::<Vec<_>>()
            .into()
    }
}

impl PostureClassifier for WheelchairClassifier {
    fn name(&self) -> &str {
        "wheelchair"
    }

    fn process(&self, batch: &FrameBatch) -> Result<ResultVector> {
        self.process_parts(batch.ids(), batch.boxes(), batch.keypoints(), batch.scores())
    }
}
