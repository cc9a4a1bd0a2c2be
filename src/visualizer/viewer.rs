// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Output window for annotated frames.
//!
//! The window title doubles as the status bar.

use image::DynamicImage;
use minifb::{Key, Window, WindowOptions};

use crate::error::{Result, SentinelError};
use crate::visualizer::Color;

/// A simple image viewer using minifb.
pub struct Viewer {
    window: Window,
    pub width: usize,
    pub height: usize,
    buffer: Vec<u32>,
}

impl Viewer {
    /// Create a new viewer window.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::VisualizerError`] if the window cannot be created.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| SentinelError::VisualizerError(format!("Failed to create window: {e}")))?;

        window.set_target_fps(60);

        Ok(Self {
            window,
            width,
            height,
            buffer: Vec::new(),
        })
    }

    /// Whether the window is still open and the user has not pressed Esc or Q.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// Show the status text in the title bar.
    pub fn set_status(&mut self, status: &str) {
        self.window.set_title(status);
    }

    /// Update the window with a new image.
    ///
    /// Returns `false` once the window has been closed.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::VisualizerError`] if the buffer cannot be presented.
    pub fn update(&mut self, image: &DynamicImage) -> Result<bool> {
        if !self.is_open() {
            return Ok(false);
        }

        let (img_width, img_height) = (image.width() as usize, image.height() as usize);
        let num_pixels = img_width * img_height;
        if self.buffer.len() != num_pixels {
            self.buffer.resize(num_pixels, 0);
        }

        // minifb expects 0x00RRGGBB per pixel
        let rgb = image.to_rgb8();
        for (dst, pixel) in self.buffer.iter_mut().zip(rgb.pixels()) {
            *dst = Color::new(pixel[0], pixel[1], pixel[2]).to_u32();
        }

        self.width = img_width;
        self.height = img_height;

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| SentinelError::VisualizerError(format!("Failed to update window: {e}")))?;

        Ok(true)
    }
}
