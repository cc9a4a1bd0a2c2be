// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame overlay rendering.

use std::fs;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_text_mut, text_size,
};
use imageproc::rect::Rect;

use crate::batch::{BoundingBox, FrameBatch};
use crate::error::{Result, SentinelError};
use crate::keypoints::SKELETON;
use crate::results::{PostureStatus, ResultVector};
use crate::visualizer::{Color, Overlay};
use crate::visualizer::color::{KPT_COLOR_INDICES, LIMB_COLOR_INDICES};

/// Top-left corner of the status text.
const TEXT_ORIGIN: (i32, i32) = (5, 5);

/// Load a TTF/OTF font for overlay text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid font.
pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|e| {
        SentinelError::ImageError(format!("invalid font {}: {e}", path.display()))
    })
}

/// Draw the selected pose elements and the frame status onto a copy of `image`.
///
/// Detections flagged in `results` get red boxes and a red outline on their
/// joints; the others get green boxes. Without a font only a status-colored
/// banner is drawn in place of the text.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn annotate_frame(
    image: &DynamicImage,
    batch: &FrameBatch,
    results: &ResultVector,
    status: PostureStatus,
    overlay: Overlay,
    font: Option<&FontVec>,
) -> DynamicImage {
    let mut img = image.to_rgb8();
    let (width, height) = img.dimensions();
    let radius = ((width.min(height) / 160).max(2)) as i32;

    for (i, kps) in batch.keypoints().iter().enumerate() {
        let flagged = results.is_wheelchair(i);

        if overlay.boxes
            && let Some(rect) = box_rect(&batch.boxes()[i])
        {
            let color = if flagged { Color::RED } else { Color::GREEN };
            draw_hollow_rect_mut(&mut img, rect, color.to_rgb());
        }

        if overlay.links {
            for (limb, &[a, b]) in SKELETON.iter().enumerate() {
                if let (Some(p), Some(q)) = (kps[a], kps[b]) {
                    let color = Color::from_pose_index(LIMB_COLOR_INDICES[limb]);
                    draw_line_segment_mut(&mut img, (p.x, p.y), (q.x, q.y), color.to_rgb());
                }
            }
        }

        if overlay.keypoints {
            for (k, kp) in kps.iter().enumerate() {
                let Some(p) = kp else { continue };
                let center = (p.x.round() as i32, p.y.round() as i32);
                if flagged {
                    draw_filled_circle_mut(&mut img, center, radius + 1, Color::RED.to_rgb());
                }
                let color = Color::from_pose_index(KPT_COLOR_INDICES[k]);
                draw_filled_circle_mut(&mut img, center, radius, color.to_rgb());
            }
        }
    }

    draw_status(&mut img, status, font);
    DynamicImage::ImageRgb8(img)
}

/// Pixel rectangle of a `[left, top, right, bottom]` box, or `None` if it is
/// smaller than one pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn box_rect(bbox: &BoundingBox) -> Option<Rect> {
    let [left, top, right, bottom] = *bbox;
    let (w, h) = ((right - left).round(), (bottom - top).round());
    if !(w >= 1.0 && h >= 1.0) {
        return None;
    }
    Some(Rect::at(left.round() as i32, top.round() as i32).of_size(w as u32, h as u32))
}

#[allow(clippy::cast_possible_wrap)]
fn draw_status(img: &mut RgbImage, status: PostureStatus, font: Option<&FontVec>) {
    let text = status.wording();
    let (x, y) = TEXT_ORIGIN;

    if let Some(f) = font {
        let scale = PxScale::from(24.0);
        let (tw, th) = text_size(scale, f, text);
        let rect = Rect::at(x - 2, y - 2).of_size(tw + 4, th + 4);
        draw_filled_rect_mut(img, rect, Color::for_status(status).to_rgb());
        draw_text_mut(img, Color::WHITE.to_rgb(), x, y, scale, f, text);
    } else {
        let banner_w = (img.width() / 4).max(16);
        let rect = Rect::at(x, y).of_size(banner_w, 12);
        draw_filled_rect_mut(img, rect, Color::for_status(status).to_rgb());
    }
}
