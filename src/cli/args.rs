// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

use crate::gpio::BackendKind;
use crate::mode::LimbMode;
use crate::visualizer::Overlay;

/// Default pose network label.
pub const DEFAULT_NETWORK: &str = "resnet18-body";

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Run Options:
    <INPUT>                  JSON-lines pose stream, or '-' for stdin [default: -]
    --network <NETWORK>      Pose network label for the status bar [default: resnet18-body]
    --threshold <THRESHOLD>  Minimum keypoint confidence [default: 0.15]
    --mode <MODE>            Limb band rule (legacy, strict) [default: legacy]
    --absent-as-origin <B>   Treat absent keypoints as (0, 0) [default: true]
    --gpio <GPIO>            GPIO backend (dry-run, sysfs) [default: dry-run]
    --detected-pin <PIN>     Pin driven high on detection [default: 9]
    --normal-pin <PIN>       Pin driven high otherwise [default: 8]
    --probe-pins <N>         Pins 0..N claimed at start-up [default: 41]
    --settle-ms <MS>         Delay after each toggle [default: 50]
    --show                   Display annotated frames in a window
    --save <DIR>             Write annotated frames to a directory
    --overlay <FLAGS>        Pose overlay (links, keypoints, boxes, none) [default: links,keypoints]
    --font <FONT>            TTF font for overlay text

Examples:
    wheelchair-sentinel run poses.jsonl
    pose-estimator | wheelchair-sentinel run - --gpio sysfs
    wheelchair-sentinel run poses.jsonl --mode strict --verbose false
    wheelchair-sentinel run poses.jsonl --show --font DejaVuSans.ttf
    wheelchair-sentinel run poses.jsonl --save runs/sentinel --overlay boxes,keypoints"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a pose stream and drive the status pins
    Run(RunArgs),
}

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON-lines pose stream, or '-' for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Pose network label shown on the status bar
    #[arg(long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Minimum keypoint confidence
    #[arg(long, default_value_t = 0.15)]
    pub threshold: f32,

    /// Limb band rule
    #[arg(long, default_value_t = LimbMode::Legacy)]
    pub mode: LimbMode,

    /// Substitute (0, 0) for absent keypoints before measuring angles
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub absent_as_origin: bool,

    /// GPIO backend
    #[arg(long, default_value = "dry-run")]
    pub gpio: BackendKind,

    /// Pin driven high while a wheelchair posture is detected
    #[arg(long, default_value_t = 9)]
    pub detected_pin: u8,

    /// Pin driven high while all postures are normal
    #[arg(long, default_value_t = 8)]
    pub normal_pin: u8,

    /// Pins 0..N probed and driven low at start-up
    #[arg(long, default_value_t = 41)]
    pub probe_pins: u8,

    /// Delay after each pin toggle, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub settle_ms: u64,

    /// Network FPS shown when the stream does not report one
    #[arg(long, default_value_t = 0.0)]
    pub fps: f32,

    /// Display annotated frames in a window
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Directory annotated frames are written to
    #[arg(long)]
    pub save: Option<String>,

    /// Pose overlay flags: links, keypoints, boxes or none
    #[arg(long, default_value = "links,keypoints")]
    pub overlay: Overlay,

    /// TTF font used for overlay text
    #[arg(long)]
    pub font: Option<String>,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_defaults() {
        let args = Cli::parse_from(["app", "run"]);
        match args.command {
            Commands::Run(run_args) => {
                assert_eq!(run_args.input, "-");
                assert_eq!(run_args.network, DEFAULT_NETWORK);
                assert!((run_args.threshold - 0.15).abs() < f32::EPSILON);
                assert_eq!(run_args.mode, LimbMode::Legacy);
                assert_eq!(run_args.gpio, BackendKind::DryRun);
                assert_eq!(run_args.detected_pin, 9);
                assert_eq!(run_args.normal_pin, 8);
                assert_eq!(run_args.settle_ms, 50);
                assert_eq!(run_args.probe_pins, 41);
                assert!(run_args.absent_as_origin);
                assert!(!run_args.show);
                assert!(run_args.verbose);
                assert!(run_args.font.is_none());
                assert!(run_args.save.is_none());
                assert_eq!(run_args.overlay, Overlay::default());
            }
        }
    }

    #[test]
    fn test_run_args_custom() {
        let args = Cli::parse_from([
            "app",
            "run",
            "poses.jsonl",
            "--mode",
            "strict",
            "--gpio",
            "sysfs",
            "--detected-pin",
            "17",
            "--settle-ms",
            "0",
            "--save",
            "runs/sentinel",
            "--overlay",
            "boxes,links",
            "--absent-as-origin",
            "false",
            "--probe-pins",
            "28",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Run(run_args) => {
                assert_eq!(run_args.input, "poses.jsonl");
                assert_eq!(run_args.mode, LimbMode::Strict);
                assert_eq!(run_args.gpio, BackendKind::Sysfs);
                assert_eq!(run_args.detected_pin, 17);
                assert_eq!(run_args.settle_ms, 0);
                assert_eq!(run_args.save.as_deref(), Some("runs/sentinel"));
                assert_eq!(
                    run_args.overlay,
                    Overlay {
                        links: true,
                        keypoints: false,
                        boxes: true
                    }
                );
                assert!(!run_args.absent_as_origin);
                assert_eq!(run_args.probe_pins, 28);
                assert!(!run_args.verbose);
            }
        }
    }

    #[test]
    fn test_run_args_invalid_mode() {
        assert!(Cli::try_parse_from(["app", "run", "--mode", "sideways"]).is_err());
    }

    #[test]
    fn test_run_args_invalid_overlay() {
        assert!(Cli::try_parse_from(["app", "run", "--overlay", "links,halo"]).is_err());
    }
}
