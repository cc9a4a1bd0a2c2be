// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame images in and annotated frames out.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};

use crate::error::{Result, SentinelError};
use crate::source::PoseFrame;
use crate::visualizer::Color;

/// Image to draw a frame's overlay on.
///
/// Loads `frame.image` when the stream names one. Otherwise, if the frame
/// reports its size, returns a black canvas of that size. Returns `None`
/// when neither is known.
///
/// # Errors
///
/// Returns [`SentinelError::ImageError`] if the frame image cannot be decoded.
pub fn frame_canvas(frame: &PoseFrame) -> Result<Option<DynamicImage>> {
    if let Some(path) = &frame.image {
        let img = image::open(path).map_err(|e| {
            SentinelError::ImageError(format!("Failed to load frame {}: {e}", path.display()))
        })?;
        return Ok(Some(img));
    }

    match (frame.width, frame.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok(Some(DynamicImage::ImageRgb8(
            RgbImage::from_pixel(w, h, Color::BLACK.to_rgb()),
        ))),
        _ => Ok(None),
    }
}

/// Writes annotated frames into a directory.
pub struct SaveResults {
    save_dir: PathBuf,
    saved: usize,
}

impl SaveResults {
    /// Create the save directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(save_dir: impl Into<PathBuf>) -> Result<Self> {
        let save_dir = save_dir.into();
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir, saved: 0 })
    }

    /// Directory frames are written to.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn saved(&self) -> usize {
        self.saved
    }

    /// Save one annotated frame.
    ///
    /// Frames that came from an image file keep its file name; the others
    /// are written as `frame_000042.jpg`.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ImageError`] if encoding or writing fails.
    pub fn save(&mut self, frame: &PoseFrame, annotated: &DynamicImage) -> Result<PathBuf> {
        let filename = frame
            .image
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(
                || format!("frame_{:06}.jpg", frame.frame),
                |name| name.to_string_lossy().into_owned(),
            );
        let save_path = self.save_dir.join(filename);

        // JPEG has no alpha channel
        annotated.to_rgb8().save(&save_path).map_err(|e| {
            SentinelError::ImageError(format!("Failed to save {}: {e}", save_path.display()))
        })?;
        self.saved += 1;
        Ok(save_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wheelchair-sentinel-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_canvas_from_frame_size() {
        let frame = PoseFrame {
            width: Some(32),
            height: Some(24),
            ..PoseFrame::default()
        };
        let canvas = frame_canvas(&frame).unwrap().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (32, 24));
        assert!(frame_canvas(&PoseFrame::default()).unwrap().is_none());
    }

    #[test]
    fn test_canvas_missing_image() {
        let frame = PoseFrame {
            image: Some(PathBuf::from("/nonexistent/frame.jpg")),
            ..PoseFrame::default()
        };
        assert!(matches!(frame_canvas(&frame), Err(SentinelError::ImageError(_))));
    }

    #[test]
    fn test_save_results_names() {
        let dir = temp_dir("save");
        let mut saver = SaveResults::new(&dir).unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::new(16, 8));

        let frame = PoseFrame {
            frame: 42,
            ..PoseFrame::default()
        };
        let path = saver.save(&frame, &img).unwrap();
        assert_eq!(path, dir.join("frame_000042.jpg"));
        assert!(path.exists());

        let named = PoseFrame {
            image: Some(PathBuf::from("/captures/cam0_0007.png")),
            ..PoseFrame::default()
        };
        let path = saver.save(&named, &img).unwrap();
        assert_eq!(path, dir.join("cam0_0007.png"));
        assert_eq!(image::open(&path).unwrap().width(), 16);
        assert_eq!(saver.saved(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }
}
