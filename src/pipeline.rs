// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-frame pipeline glue.
//!
//! For each [`PoseFrame`] the [`Pipeline`] packs the poses into a
//! [`FrameBatch`], runs the classifier once, hands the [`ResultVector`] to the
//! sink and reports the status wording and status bar text.

use crate::batch::FrameBatch;
use crate::classifier::PostureClassifier;
use crate::error::Result;
use crate::results::{PostureStatus, ResultVector};
use crate::sink::PostureSink;
use crate::source::{PoseFrame, PoseSource};
use crate::verbose;

/// Status bar text: `"{network} | Network {fps:.0} FPS | {wording}"`.
#[must_use]
pub fn status_line(network: &str, fps: f32, status: PostureStatus) -> String {
    format!("{network} | Network {fps:.0} FPS | {}", status.wording())
}

/// Outcome of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Frame index within the stream.
    pub frame: usize,
    /// Detections that were classified.
    pub batch: FrameBatch,
    /// Per-detection flags.
    pub results: ResultVector,
    /// Frame-level status.
    pub status: PostureStatus,
    /// Status bar text.
    pub status_line: String,
}

/// Summary of a whole stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Frames processed.
    pub frames: usize,
    /// Frames whose status was "Wheelchair detected".
    pub detected_frames: usize,
    /// Detections classified across all frames.
    pub detections: usize,
}

/// Classify frames and forward results to a sink.
pub struct Pipeline<C: PostureClassifier, S: PostureSink> {
    classifier: C,
    sink: S,
    network: String,
    threshold: f32,
    default_fps: f32,
}

impl<C: PostureClassifier, S: PostureSink> Pipeline<C, S> {
    /// Create a pipeline.
    ///
    /// # Arguments
    ///
    /// * `classifier` - Posture classifier run once per frame.
    /// * `sink` - Receiver of each frame's results.
    /// * `network` - Pose network label shown on the status bar.
    /// * `threshold` - Minimum keypoint confidence; weaker keypoints are absent.
    pub fn new(classifier: C, sink: S, network: impl Into<String>, threshold: f32) -> Self {
        Self {
            classifier,
            sink,
            network: network.into(),
            threshold,
            default_fps: 0.0,
        }
    }

    /// Set the FPS shown when a frame does not report one.
    #[must_use]
    pub const fn with_default_fps(mut self, fps: f32) -> Self {
        self.default_fps = fps;
        self
    }

    /// Get the classifier.
    pub const fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Get the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Process one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if classification or the sink fails.
    pub fn process_frame(&mut self, frame: &PoseFrame) -> Result<FrameReport> {
        let batch = frame.to_batch(self.threshold);
        verbose!("detected {} objects in image", batch.len());

        let results = self.classifier.process(&batch)?;
        verbose!("{} {}", self.classifier.name(), results);
        for (det, flag) in batch.iter().zip(results.flags()) {
            verbose!("  person {}: {} keypoints, flag {flag}", det.id, det.visible_count());
        }

        self.sink.on_result(&results)?;

        let status = results.status();
        let fps = frame.fps.unwrap_or(self.default_fps);
        Ok(FrameReport {
            frame: frame.frame,
            status_line: status_line(&self.network, fps, status),
            batch,
            results,
            status,
        })
    }

    /// Process frames until the stream ends or `on_frame` returns `false`, then shut the sink down.
    ///
    /// # Errors
    ///
    /// Returns the first source, classification or sink error. The sink is
    /// shut down before the error is returned.
    pub fn run<P, F>(&mut self, mut source: P, mut on_frame: F) -> Result<RunSummary>
    where
        P: PoseSource,
        F: FnMut(&PoseFrame, &FrameReport) -> bool,
    {
        let mut summary = RunSummary::default();
        let outcome = (|| -> Result<()> {
            while let Some(frame) = source.next_frame() {
                let frame = frame?;
                let report = self.process_frame(&frame)?;

                summary.frames += 1;
                summary.detections += report.results.len();
                if report.status.is_detected() {
                    summary.detected_frames += 1;
                }

                if !on_frame(&frame, &report) {
                    break;
                }
            }
            Ok(())
        })();

        let shutdown = self.sink.shutdown();
        outcome?;
        shutdown?;
        Ok(summary)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::WheelchairClassifier;
    use crate::error::SentinelError;
    use crate::sink::NullSink;

    /// Sink that counts calls.
    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        shutdowns: usize,
    }

    impl PostureSink for CountingSink {
        fn on_result(&mut self, _results: &ResultVector) -> Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn shutdown(&mut self) -> Result<()> {
            self.shutdowns += 1;
            Ok(())
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line("resnet18-body", 29.6, PostureStatus::Normal),
            "resnet18-body | Network 30 FPS | Normal"
        );
        assert_eq!(
            status_line("densenet121-body", 12.0, PostureStatus::WheelchairDetected),
            "densenet121-body | Network 12 FPS | Wheelchair detected"
        );
    }

    #[test]
    fn test_empty_frame_is_normal() {
        let mut pipeline =
            Pipeline::new(WheelchairClassifier::default(), NullSink, "resnet18-body", 0.15)
                .with_default_fps(25.0);
        let report = pipeline.process_frame(&PoseFrame::default()).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.status, PostureStatus::Normal);
        assert_eq!(report.status_line, "resnet18-body | Network 25 FPS | Normal");
    }

    #[test]
    fn test_run_shuts_down_on_error() {
        let mut pipeline = Pipeline::new(
            WheelchairClassifier::default(),
            CountingSink::default(),
            "net",
            0.15,
        );
        let frames = vec![
            Ok(PoseFrame::default()),
            Err(SentinelError::SourceError("broken".to_string())),
            Ok(PoseFrame::default()),
        ];
        assert!(pipeline.run(frames.into_iter(), |_, _| true).is_err());
        assert_eq!(pipeline.sink().frames, 1);
        assert_eq!(pipeline.sink().shutdowns, 1);
    }

    #[test]
    fn test_run_stops_when_asked() {
        let mut pipeline = Pipeline::new(
            WheelchairClassifier::default(),
            CountingSink::default(),
            "net",
            0.15,
        );
        let frames = (0..5).map(|i| {
            Ok(PoseFrame {
                frame: i,
                ..PoseFrame::default()
            })
        });
        let summary = pipeline.run(frames, |frame, _| frame.frame < 2).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.detected_frames, 0);
        assert_eq!(pipeline.sink().shutdowns, 1);
    }
}
