// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-frame detection batches.
//!
//! A [`FrameBatch`] holds the detections of one video frame as four parallel
//! sequences: ids, boxes, keypoints and keypoint scores. Every constructor
//! checks that the sequences have equal length, so a classifier can assume a
//! well-formed batch.

use ndarray::{Array1, Array2, Array3, Axis};

use crate::error::{Result, SentinelError};
use crate::geometry::Point;
use crate::keypoints::{KEYPOINT_COUNT, KeypointScores, PoseKeypoints, from_sentinel};

/// Bounding box as `[left, top, right, bottom]`.
pub type BoundingBox = [f32; 4];

/// One observed person in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Tracking or detection identifier.
    pub id: u64,
    /// Bounding box.
    pub bbox: BoundingBox,
    /// Keypoints indexed by anatomical position.
    pub keypoints: PoseKeypoints,
    /// Per-keypoint confidence scores.
    pub scores: KeypointScores,
}

impl Detection {
    /// Create a detection with unit id, unit box and unit scores.
    #[must_use]
    pub const fn from_keypoints(keypoints: PoseKeypoints) -> Self {
        Self {
            id: 1,
            bbox: [1.0; 4],
            keypoints,
            scores: [1.0; KEYPOINT_COUNT],
        }
    }

    /// Number of keypoints that are present.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.keypoints.iter().filter(|k| k.is_some()).count()
    }
}

/// Detections of one frame as parallel sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameBatch {
    ids: Vec<u64>,
    boxes: Vec<BoundingBox>,
    keypoints: Vec<PoseKeypoints>,
    scores: Vec<KeypointScores>,
}

impl FrameBatch {
    /// Create a batch from parallel sequences.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::InvalidBatchShape`] if the sequences differ in length.
    pub fn new(
        ids: Vec<u64>,
        boxes: Vec<BoundingBox>,
        keypoints: Vec<PoseKeypoints>,
        scores: Vec<KeypointScores>,
    ) -> Result<Self> {
        check_lengths(ids.len(), boxes.len(), keypoints.len(), scores.len())?;
        Ok(Self {
            ids,
            boxes,
            keypoints,
            scores,
        })
    }

    /// Create a batch from tensors laid out like pose model output.
    ///
    /// # Arguments
    ///
    /// * `ids` - Shape `(N,)`.
    /// * `boxes` - Shape `(N, 4)`.
    /// * `keypoints` - Shape `(N, 17, 2)` or `(N, 17, 3)`; only the first two channels are read.
    ///   `(0, 0)` entries are treated as absent.
    /// * `scores` - Shape `(N, 17, 1)`; only the first channel is read.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::InvalidBatchShape`] if the tensor shapes disagree.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_arrays(
        ids: &Array1<f32>,
        boxes: &Array2<f32>,
        keypoints: &Array3<f32>,
        scores: &Array3<f32>,
    ) -> Result<Self> {
        let n = ids.len();
        check_lengths(n, boxes.len_of(Axis(0)), keypoints.len_of(Axis(0)), scores.len_of(Axis(0)))?;

        if boxes.shape()[1] != 4 {
            return Err(SentinelError::InvalidBatchShape(format!(
                "boxes must have 4 columns, got {}",
                boxes.shape()[1]
            )));
        }
        let kshape = keypoints.shape();
        if kshape[1] != KEYPOINT_COUNT || kshape[2] < 2 {
            return Err(SentinelError::InvalidBatchShape(format!(
                "keypoints must have shape (N, {KEYPOINT_COUNT}, 2+), got {kshape:?}"
            )));
        }
        if scores.shape()[1] != KEYPOINT_COUNT || scores.shape()[2] == 0 {
            return Err(SentinelError::InvalidBatchShape(format!(
                "scores must have shape (N, {KEYPOINT_COUNT}, 1), got {:?}",
                scores.shape()
            )));
        }

        let mut batch = Self::default();
        for i in 0..n {
            let mut raw = [Point::ORIGIN; KEYPOINT_COUNT];
            let mut row_scores = [0.0; KEYPOINT_COUNT];
            for k in 0..KEYPOINT_COUNT {
                raw[k] = Point::new(keypoints[[i, k, 0]], keypoints[[i, k, 1]]);
                row_scores[k] = scores[[i, k, 0]];
            }
            batch.ids.push(ids[i].max(0.0) as u64);
            batch.boxes.push([boxes[[i, 0]], boxes[[i, 1]], boxes[[i, 2]], boxes[[i, 3]]]);
            batch.keypoints.push(from_sentinel(&raw));
            batch.scores.push(row_scores);
        }
        Ok(batch)
    }

    /// Create a batch from a list of detections.
    #[must_use]
    pub fn from_detections<I>(detections: I) -> Self
    where
        I: IntoIterator<Item = Detection>,
    {
        let mut batch = Self::default();
        for det in detections {
            batch.push(det);
        }
        batch
    }

    /// Append one detection.
    pub fn push(&mut self, detection: Detection) {
        self.ids.push(detection.id);
        self.boxes.push(detection.bbox);
        self.keypoints.push(detection.keypoints);
        self.scores.push(detection.scores);
    }

    /// Number of detections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the batch has no detections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Detection ids.
    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Bounding boxes.
    #[must_use]
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    /// Keypoint sets.
    #[must_use]
    pub fn keypoints(&self) -> &[PoseKeypoints] {
        &self.keypoints
    }

    /// Keypoint scores.
    #[must_use]
    pub fn scores(&self) -> &[KeypointScores] {
        &self.scores
    }

    /// Get a copy of the detection at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Detection> {
        Some(Detection {
            id: *self.ids.get(index)?,
            bbox: *self.boxes.get(index)?,
            keypoints: *self.keypoints.get(index)?,
            scores: *self.scores.get(index)?,
        })
    }

    /// Iterate detections in batch order.
    pub fn iter(&self) -> impl Iterator<Item = Detection> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Check that the four parallel sequences have the same length.
///
/// # Errors
///
/// Returns [`SentinelError::InvalidBatchShape`] describing the mismatch.
pub fn check_lengths(ids: usize, boxes: usize, keypoints: usize, scores: usize) -> Result<()> {
    if ids == boxes && ids == keypoints && ids == scores {
        Ok(())
    } else {
        Err(SentinelError::InvalidBatchShape(format!(
            "{ids} ids, {boxes} boxes, {keypoints} keypoint sets, {scores} score sets"
        )))
    }
}
