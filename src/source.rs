// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose stream input.
//!
//! The pose estimator runs outside this crate. Its per-frame output reaches
//! the sentinel as a stream of [`PoseFrame`]s, one JSON object per line:
//!
//! ```json
//! {"frame": 0, "width": 1280, "height": 720, "fps": 29.7,
//!  "poses": [{"id": 1, "bbox": [10, 20, 200, 400],
//!             "keypoints": [{"id": 13, "x": 120.5, "y": 310.0, "score": 0.91}]}]}
//! ```
//!
//! Every field except `poses[].keypoints` is optional. Blank lines and
//! `null` lines are capture timeouts and are skipped. Keypoint ids outside
//! the 17-point layout, negative ones included, are dropped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::batch::{BoundingBox, Detection, FrameBatch};
use crate::error::{Result, SentinelError};
use crate::geometry::Point;
use crate::keypoints::{KEYPOINT_COUNT, KeypointIndex, PoseKeypoints};

/// A keypoint as reported by the pose estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledKeypoint {
    /// Anatomical index. Values outside `0..17` are ignored.
    pub id: i64,
    pub x: f32,
    pub y: f32,
    /// Confidence, if the estimator reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// One detected person.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    pub keypoints: Vec<LabeledKeypoint>,
}

impl Pose {
    /// Pack this pose into a [`Detection`].
    ///
    /// Keypoints below `threshold` or outside the 17-point layout are absent.
    /// Missing ids, boxes and scores default to ones.
    #[must_use]
    pub fn to_detection(&self, threshold: f32) -> Detection {
        let mut keypoints: PoseKeypoints = [None; KEYPOINT_COUNT];
        let mut scores = [1.0; KEYPOINT_COUNT];

        for kp in &self.keypoints {
            let Some(index) = usize::try_from(kp.id)
                .ok()
                .and_then(KeypointIndex::from_index)
                .map(KeypointIndex::index)
            else {
                continue;
            };
            let score = kp.score.unwrap_or(1.0);
            if score < threshold || keypoints[index].is_some() {
                continue;
            }
            keypoints[index] = Some(Point::new(kp.x, kp.y));
            scores[index] = score;
        }

        Detection {
            id: self.id.unwrap_or(1),
            bbox: self.bbox.unwrap_or([1.0; 4]),
            keypoints,
            scores,
        }
    }
}

/// Pose estimator output for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Frame index within the stream.
    #[serde(default)]
    pub frame: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Network throughput reported by the estimator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f32>,
    /// Path of the frame image, for overlay rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub poses: Vec<Pose>,
}

impl PoseFrame {
    /// Pack all poses into a frame batch.
    #[must_use]
    pub fn to_batch(&self, threshold: f32) -> FrameBatch {
        FrameBatch::from_detections(self.poses.iter().map(|p| p.to_detection(threshold)))
    }
}

/// Where the pose stream is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input.
    Stdin,
    /// JSON-lines file.
    File(PathBuf),
}

impl From<&str> for InputSource {
    fn from(s: &str) -> Self {
        if s.is_empty() || s == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(s))
        }
    }
}

impl InputSource {
    /// Open the stream.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::SourceError`] if the file cannot be opened.
    pub fn open(&self) -> Result<PoseStream<Box<dyn BufRead>>> {
        let reader: Box<dyn BufRead> = match self {
            Self::Stdin => Box::new(BufReader::new(io::stdin())),
            Self::File(path) => Box::new(BufReader::new(open_file(path)?)),
        };
        Ok(PoseStream::new(reader))
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| SentinelError::SourceError(format!("cannot open {}: {e}", path.display())))
}

/// Supplier of pose frames for the pipeline.
///
/// Any iterator of `Result<PoseFrame>` is a source, which covers [`PoseStream`]
/// as well as in-memory frame lists.
pub trait PoseSource {
    /// Read the next frame. `None` ends the stream.
    fn next_frame(&mut self) -> Option<Result<PoseFrame>>;
}

impl<I> PoseSource for I
where
    I: Iterator<Item = Result<PoseFrame>>,
{
    fn next_frame(&mut self) -> Option<Result<PoseFrame>> {
        self.next()
    }
}

/// Iterator over the frames of a JSON-lines pose stream.
pub struct PoseStream<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
}

impl<R: BufRead> PoseStream<R> {
    /// Wrap a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for PoseStream<R> {
    type Item = Result<PoseFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;

            let text = self.line.trim();
            if text.is_empty() || text == "null" {
                continue;
            }

            return Some(serde_json::from_str(text).map_err(|e| {
                SentinelError::SourceError(format!("line {}: {e}", self.line_no))
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_input_source_from_str() {
        assert_eq!(InputSource::from("-"), InputSource::Stdin);
        assert_eq!(InputSource::from(""), InputSource::Stdin);
        assert_eq!(
            InputSource::from("poses.jsonl"),
            InputSource::File(PathBuf::from("poses.jsonl"))
        );
    }

    #[test]
    fn test_stream_skips_timeouts() {
        let data = "\n{\"frame\": 0, \"poses\": []}\nnull\n{\"frame\": 1, \"fps\": 30.0}\n";
        let frames: Vec<PoseFrame> = PoseStream::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].frame, 1);
        assert_eq!(frames[1].fps, Some(30.0));
        assert!(frames[1].poses.is_empty());
    }

    #[test]
    fn test_stream_reports_bad_line() {
        let data = "{\"frame\": 0}\n{not json\n";
        let mut stream = PoseStream::new(Cursor::new(data));
        assert!(stream.next().unwrap().is_ok());
        let err = stream.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_pose_to_detection() {
        let pose = Pose {
            id: None,
            bbox: None,
            keypoints: vec![
                LabeledKeypoint { id: 13, x: 5.0, y: 6.0, score: Some(0.9) },
                LabeledKeypoint { id: 11, x: 1.0, y: 2.0, score: Some(0.05) },
                LabeledKeypoint { id: 20, x: 1.0, y: 2.0, score: None },
                LabeledKeypoint { id: 5, x: 3.0, y: 4.0, score: None },
                LabeledKeypoint { id: -1, x: 8.0, y: 8.0, score: Some(0.99) },
            ],
        };

        let det = pose.to_detection(0.15);
        assert_eq!(det.id, 1);
        assert_eq!(det.bbox, [1.0; 4]);
        assert_eq!(det.keypoints[13], Some(Point::new(5.0, 6.0)));
        assert_eq!(det.keypoints[11], None);
        assert_eq!(det.keypoints[5], Some(Point::new(3.0, 4.0)));
        assert!((det.scores[13] - 0.9).abs() < f32::EPSILON);
        assert_eq!(det.visible_count(), 2);
    }

    #[test]
    fn test_negative_keypoint_id_dropped() {
        let data = r#"{"poses": [{"keypoints": [{"id": -1, "x": 4, "y": 4}, {"id": 13, "x": 5, "y": 6}]}]}"#;
        let mut stream = PoseStream::new(Cursor::new(data));
        let frame = stream.next_frame().unwrap().unwrap();
        let batch = frame.to_batch(0.15);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.keypoints()[0][13], Some(Point::new(5.0, 6.0)));
        assert_eq!(batch.keypoints()[0].iter().filter(|k| k.is_some()).count(), 1);
        assert!(stream.next_frame().is_none());
    }

    #[test]
    fn test_frame_to_batch() {
        let frame: PoseFrame = serde_json::from_str(
            r#"{"poses": [{"id": 4, "bbox": [0, 0, 10, 20], "keypoints": []},
                          {"keypoints": [{"id": 0, "x": 1, "y": 1}]}]}"#,
        )
        .unwrap();
        let batch = frame.to_batch(0.15);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.ids(), &[4, 1]);
        assert_eq!(batch.boxes()[0], [0.0, 0.0, 10.0, 20.0]);
    }
}
