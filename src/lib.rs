// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Wheelchair Sentinel
//!
//! Wheelchair posture detection from 2-D body keypoints. For every video frame
//! a pose estimator reports the people it sees as 17-point body keypoints; the
//! sentinel classifies each person from knee and hip joint angles, reduces the
//! frame to "Wheelchair detected" or "Normal", drives two GPIO output pins to
//! match and overlays the status on the output video.
//!
//! ## Quick Start (Library)
//!
//! ```rust
//! use wheelchair_sentinel::{
//!     Detection, FrameBatch, Point, PostureClassifier, PostureStatus, WheelchairClassifier,
//!     keypoints::pack_labeled,
//! };
//!
//! // Seated: thigh horizontal, shin vertical, torso upright
//! let keypoints = pack_labeled([
//!     (5, Point::new(100.0, 100.0)),  // left shoulder
//!     (11, Point::new(100.0, 300.0)), // left hip
//!     (13, Point::new(250.0, 300.0)), // left knee
//!     (15, Point::new(250.0, 450.0)), // left ankle
//! ]);
//!
//! let classifier = WheelchairClassifier::default();
//! let results = classifier.process(&FrameBatch::from_detections([Detection::from_keypoints(keypoints)]))?;
//! assert_eq!(results.flags(), &[1]);
//! assert_eq!(results.status(), PostureStatus::WheelchairDetected);
//! # Ok::<(), wheelchair_sentinel::SentinelError>(())
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Classify a JSON-lines pose stream, logging pin writes
//! wheelchair-sentinel run poses.jsonl
//!
//! # Pipe a live estimator into the sentinel and drive sysfs GPIO
//! pose-estimator | wheelchair-sentinel run - --gpio sysfs
//!
//! # Per-leg band rule, annotated window
//! wheelchair-sentinel run poses.jsonl --mode strict --show --font DejaVuSans.ttf
//!
//! # Save annotated frames with boxes
//! wheelchair-sentinel run poses.jsonl --save runs/sentinel --overlay links,keypoints,boxes
//! ```
//!
//! ## Classification Rule
//!
//! Four angles are measured with [`get_angle`]: each knee (hip, knee, ankle)
//! and each hip (shoulder, hip, knee). The knees are bent when the knee pair
//! passes the `(70°, 120°)` band, the hips likewise; a person is flagged when
//! both are bent. In [`LimbMode::Legacy`] the band is passed when *some* knee
//! is below 120° and *some* knee is above 70°, possibly different knees.
//! [`LimbMode::Strict`] requires one side to lie inside the band by itself.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | [`Point`] and [`get_angle`] |
//! | [`keypoints`] | 17-point body layout and skeleton |
//! | [`batch`] | [`FrameBatch`] and [`Detection`] |
//! | [`classifier`] | [`PostureClassifier`] and [`WheelchairClassifier`] |
//! | [`results`] | [`ResultVector`] and [`PostureStatus`] |
//! | [`config`] | [`ClassifierConfig`] and [`ActuatorConfig`] |
//! | [`gpio`] | GPIO backends and the start-up [`PinBank`] |
//! | [`sink`] | [`PostureSink`] and [`GpioSink`] |
//! | [`source`] | JSON-lines pose stream input |
//! | [`pipeline`] | Per-frame glue |
//! | [`io`] | Frame canvases and [`SaveResults`](io::SaveResults) |
//! | [`error`] | Error types ([`SentinelError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `annotate` | Skeleton and status overlay (default) |
//! | `visualize` | Output window with the status bar in its title (default) |

// Modules
#[cfg(feature = "annotate")]
pub mod annotate;
pub mod batch;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gpio;
pub mod io;
pub mod keypoints;
pub mod mode;
pub mod pipeline;
pub mod results;
pub mod sink;
pub mod source;
pub mod visualizer;

// Re-export main types for convenience
pub use batch::{BoundingBox, Detection, FrameBatch};
pub use classifier::{JointAngles, PostureClassifier, WheelchairClassifier};
pub use config::{ActuatorConfig, ClassifierConfig};
pub use error::{Result, SentinelError};
pub use geometry::{DEGENERATE_ANGLE, Point, get_angle};
pub use gpio::{BackendKind, DryRunBackend, GpioBackend, PinBank, PinLevel, SysfsBackend};
pub use keypoints::{KEYPOINT_COUNT, KeypointIndex, PoseKeypoints};
pub use mode::LimbMode;
pub use pipeline::{FrameReport, Pipeline, RunSummary, status_line};
pub use results::{PostureStatus, ResultVector};
pub use sink::{GpioSink, NullSink, PostureSink};
pub use source::{InputSource, LabeledKeypoint, Pose, PoseFrame, PoseSource, PoseStream};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "wheelchair-sentinel");
    }
}
