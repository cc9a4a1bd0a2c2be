// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 17-point COCO body keypoint layout.

use crate::geometry::Point;

/// Number of keypoints in the body layout.
pub const KEYPOINT_COUNT: usize = 17;

/// Keypoints for one detection, indexed by [`KeypointIndex`]. `None` marks an absent keypoint.
pub type PoseKeypoints = [Option<Point>; KEYPOINT_COUNT];

/// Per-keypoint confidence scores for one detection.
pub type KeypointScores = [f32; KEYPOINT_COUNT];

/// Anatomical keypoint indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    /// All indices in layout order.
    pub const ALL: [Self; KEYPOINT_COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Look up an index by its position in the layout.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this keypoint in the layout.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Skeleton structure (pairs of keypoint indices) used for overlay drawing.
pub const SKELETON: [[usize; 2]; 19] = [
    [15, 13], // left ankle to left knee
    [13, 11], // left knee to left hip
    [16, 14], // right ankle to right knee
    [14, 12], // right knee to right hip
    [11, 12], // left hip to right hip
    [5, 11],  // left shoulder to left hip
    [6, 12],  // right shoulder to right hip
    [5, 6],   // left shoulder to right shoulder
    [5, 7],   // left shoulder to left elbow
    [6, 8],   // right shoulder to right elbow
    [7, 9],   // left elbow to left wrist
    [8, 10],  // right elbow to right wrist
    [1, 2],   // left eye to right eye
    [0, 1],   // nose to left eye
    [0, 2],   // nose to right eye
    [1, 3],   // left eye to left ear
    [2, 4],   // right eye to right ear
    [3, 5],   // left ear to left shoulder
    [4, 6],   // right ear to right shoulder
];

/// Read a keypoint, substituting the `(0, 0)` sentinel when absent.
#[must_use]
pub fn point_or_origin(keypoints: &PoseKeypoints, index: KeypointIndex) -> Point {
    keypoints[index.index()].unwrap_or(Point::ORIGIN)
}

/// Pack a sparse set of labeled keypoints into a full layout.
///
/// Ids outside the layout are ignored. When the same id appears twice the first one wins.
#[must_use]
pub fn pack_labeled<I>(labeled: I) -> PoseKeypoints
where
    I: IntoIterator<Item = (usize, Point)>,
{
    let mut keypoints: PoseKeypoints = [None; KEYPOINT_COUNT];
    for (id, point) in labeled {
        if let Some(slot) = keypoints.get_mut(id)
            && slot.is_none()
        {
            *slot = Some(point);
        }
    }
    keypoints
}

/// Convert a sentinel-encoded keypoint row into optional keypoints.
///
/// `(0, 0)` entries become `None`.
#[must_use]
pub fn from_sentinel(points: &[Point; KEYPOINT_COUNT]) -> PoseKeypoints {
    points.map(|p| if p.is_origin() { None } else { Some(p) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, kp) in KeypointIndex::ALL.iter().enumerate() {
            assert_eq!(kp.index(), i);
            assert_eq!(KeypointIndex::from_index(i), Some(*kp));
        }
        assert_eq!(KeypointIndex::from_index(17), None);
    }

    #[test]
    fn test_pack_labeled_fills_absent() {
        let kps = pack_labeled([(13, Point::new(4.0, 5.0)), (0, Point::new(1.0, 1.0))]);
        assert_eq!(kps[13], Some(Point::new(4.0, 5.0)));
        assert_eq!(kps[0], Some(Point::new(1.0, 1.0)));
        assert_eq!(kps.iter().filter(|k| k.is_none()).count(), 15);
        assert_eq!(point_or_origin(&kps, KeypointIndex::LeftHip), Point::ORIGIN);
    }

    #[test]
    fn test_pack_labeled_ignores_out_of_range() {
        let kps = pack_labeled([(17, Point::new(1.0, 1.0)), (40, Point::new(2.0, 2.0))]);
        assert!(kps.iter().all(Option::is_none));
    }

    #[test]
    fn test_pack_labeled_first_wins() {
        let kps = pack_labeled([(5, Point::new(1.0, 1.0)), (5, Point::new(9.0, 9.0))]);
        assert_eq!(kps[5], Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_from_sentinel() {
        let mut raw = [Point::ORIGIN; KEYPOINT_COUNT];
        raw[11] = Point::new(10.0, 20.0);
        let kps = from_sentinel(&raw);
        assert_eq!(kps[11], Some(Point::new(10.0, 20.0)));
        assert!(kps[12].is_none());
    }

    #[test]
    fn test_skeleton_indices_in_range() {
        assert!(SKELETON.iter().flatten().all(|&i| i < KEYPOINT_COUNT));
    }
}
