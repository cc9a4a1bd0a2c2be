// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;
use std::time::Duration;

use crate::cli::args::RunArgs;
use crate::pipeline::{FrameReport, Pipeline, RunSummary};
use crate::source::{InputSource, PoseFrame};
use crate::{
    ActuatorConfig, ClassifierConfig, GpioSink, VERSION, WheelchairClassifier, error, info,
    section, success, verbose,
};

#[cfg(feature = "annotate")]
use crate::annotate::{annotate_frame, load_font};
#[cfg(feature = "annotate")]
use crate::io::{SaveResults, frame_canvas};
#[cfg(all(feature = "annotate", feature = "visualize"))]
use crate::visualizer::Viewer;
#[cfg(feature = "annotate")]
use crate::visualizer::Overlay;
#[cfg(all(feature = "annotate", feature = "visualize"))]
use image::DynamicImage;
#[cfg(feature = "annotate")]
use std::path::Path;

/// Run the sentinel over a pose stream.
pub fn run_sentinel(args: &RunArgs) {
    crate::cli::logging::set_verbose(args.verbose);

    let config = ClassifierConfig::new()
        .with_mode(args.mode)
        .with_absent_as_origin(args.absent_as_origin);
    let classifier = match WheelchairClassifier::new(config) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let actuator = ActuatorConfig::new()
        .with_detected_pin(args.detected_pin)
        .with_normal_pin(args.normal_pin)
        .with_probe_pins(0..args.probe_pins)
        .with_settle(Duration::from_millis(args.settle_ms));

    let sink = match GpioSink::new(args.gpio.build(), actuator) {
        Ok(s) => s,
        Err(e) => {
            error!("Error configuring GPIO: {e}");
            process::exit(1);
        }
    };

    verbose!(
        "{} GPIO pins claimed, {} N/A",
        sink.bank().pins().len(),
        sink.bank().unavailable().len()
    );

    let stream = match InputSource::from(args.input.as_str()).open() {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    info!("Wheelchair Sentinel {VERSION} 🚀 mode={} gpio={:?}", args.mode, args.gpio);
    verbose!(
        "network={} threshold={} pins: detected={} normal={}",
        args.network,
        args.threshold,
        args.detected_pin,
        args.normal_pin
    );

    let mut pipeline = Pipeline::new(classifier, sink, args.network.clone(), args.threshold)
        .with_default_fps(args.fps);

    let mut output = match Output::new(args) {
        Ok(o) => o,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    let summary = pipeline.run(stream, |frame, report| {
        verbose!("{}", report.status.wording());
        output.render(frame, report)
    });

    match summary {
        Ok(summary) => {
            print_summary(&summary);
            output.finish();
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn print_summary(summary: &RunSummary) {
    section!("Summary");
    verbose!(
        "{} frames, {} detections, {} frames with a wheelchair posture",
        summary.frames,
        summary.detections,
        summary.detected_frames
    );
    success!("Stream finished, all pins driven low");
}

/// Optional overlay rendering, output window and saved frames.
struct Output {
    #[cfg(feature = "annotate")]
    font: Option<ab_glyph::FontVec>,
    #[cfg(feature = "annotate")]
    overlay: Overlay,
    #[cfg(feature = "annotate")]
    saver: Option<SaveResults>,
    #[cfg(all(feature = "annotate", feature = "visualize"))]
    viewer: Option<Viewer>,
    #[cfg(all(feature = "annotate", feature = "visualize"))]
    show: bool,
}

impl Output {
    fn new(args: &RunArgs) -> crate::Result<Self> {
        #[cfg(not(feature = "visualize"))]
        if args.show {
            crate::warn!(
                "--show requires the 'visualize' feature. Compile with --features visualize to enable it."
            );
        }
        #[cfg(all(feature = "visualize", not(feature = "annotate")))]
        if args.show {
            crate::warn!(
                "--show requires the 'annotate' feature. Compile with --features annotate to enable it."
            );
        }
        #[cfg(not(feature = "annotate"))]
        if args.save.is_some() {
            crate::warn!(
                "--save requires the 'annotate' feature. Compile with --features annotate to enable it."
            );
        }

        #[cfg(feature = "annotate")]
        let font = args.font.as_deref().and_then(|path| match load_font(Path::new(path)) {
            Ok(f) => Some(f),
            Err(e) => {
                crate::warn!("{e}, overlay text disabled");
                None
            }
        });

        #[cfg(feature = "annotate")]
        let saver = match args.save.as_deref() {
            Some(dir) => Some(SaveResults::new(dir)?),
            None => None,
        };

        Ok(Self {
            #[cfg(feature = "annotate")]
            font,
            #[cfg(feature = "annotate")]
            overlay: args.overlay,
            #[cfg(feature = "annotate")]
            saver,
            #[cfg(all(feature = "annotate", feature = "visualize"))]
            viewer: None,
            #[cfg(all(feature = "annotate", feature = "visualize"))]
            show: args.show,
        })
    }

    /// Annotate one frame, then save and display it. Returns `false` once the window has been closed.
    #[cfg(feature = "annotate")]
    fn render(&mut self, frame: &PoseFrame, report: &FrameReport) -> bool {
        #[cfg(feature = "visualize")]
        let show = self.show;
        #[cfg(not(feature = "visualize"))]
        let show = false;

        if !show && self.saver.is_none() {
            return true;
        }

        let img = match frame_canvas(frame) {
            Ok(Some(img)) => img,
            Ok(None) => return true,
            Err(e) => {
                error!("{e}");
                return true;
            }
        };
        let annotated = annotate_frame(
            &img,
            &report.batch,
            &report.results,
            report.status,
            self.overlay,
            self.font.as_ref(),
        );

        if let Some(saver) = self.saver.as_mut() {
            match saver.save(frame, &annotated) {
                Ok(path) => verbose!("saved {}", path.display()),
                Err(e) => error!("{e}"),
            }
        }

        #[cfg(feature = "visualize")]
        let keep_open = !show || self.present(&report.status_line, &annotated);
        #[cfg(not(feature = "visualize"))]
        let keep_open = true;
        keep_open
    }

    #[cfg(not(feature = "annotate"))]
    #[allow(clippy::unused_self)]
    const fn render(&mut self, _frame: &PoseFrame, _report: &FrameReport) -> bool {
        true
    }

    #[cfg(all(feature = "annotate", feature = "visualize"))]
    fn present(&mut self, status_line: &str, annotated: &DynamicImage) -> bool {
        let (w, h) = (annotated.width() as usize, annotated.height() as usize);
        if let Some(ref v) = self.viewer
            && (v.width != w || v.height != h)
        {
            self.viewer = None;
        }
        if self.viewer.is_none() {
            match Viewer::new(status_line, w, h) {
                Ok(v) => self.viewer = Some(v),
                Err(e) => {
                    error!("{e}");
                    self.show = false;
                    return true;
                }
            }
        }

        if let Some(ref mut v) = self.viewer {
            v.set_status(status_line);
            return v.update(annotated).unwrap_or(false);
        }
        true
    }

    #[cfg(feature = "annotate")]
    fn finish(&self) {
        if let Some(saver) = &self.saver {
            success!("{} frames saved to {}", saver.saved(), saver.save_dir().display());
        }
    }

    #[cfg(not(feature = "annotate"))]
    #[allow(clippy::unused_self)]
    const fn finish(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullSink;
    use crate::cli::args::{Cli, Commands};
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        match Cli::parse_from(argv.iter().copied()).command {
            Commands::Run(args) => args,
        }
    }

    fn report_for(frame: &PoseFrame) -> FrameReport {
        let mut pipeline = Pipeline::new(WheelchairClassifier::default(), NullSink, "net", 0.15);
        pipeline.process_frame(frame).unwrap()
    }

    #[test]
    fn test_show_without_canvas_keeps_running() {
        let mut output = Output::new(&run_args(&["app", "run", "--show"])).unwrap();
        let frame = PoseFrame::default();
        assert!(output.render(&frame, &report_for(&frame)));
    }

    #[cfg(feature = "annotate")]
    #[test]
    fn test_save_writes_annotated_frames() {
        let dir = std::env::temp_dir()
            .join(format!("wheelchair-sentinel-{}-run", std::process::id()));
        let dir_arg = dir.to_string_lossy().into_owned();
        let args = run_args(&["app", "run", "--save", dir_arg.as_str(), "--overlay", "boxes"]);
        let mut output = Output::new(&args).unwrap();

        let frame = PoseFrame {
            frame: 3,
            width: Some(20),
            height: Some(10),
            ..PoseFrame::default()
        };
        assert!(output.render(&frame, &report_for(&frame)));
        assert!(dir.join("frame_000003.jpg").exists());
        output.finish();

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
