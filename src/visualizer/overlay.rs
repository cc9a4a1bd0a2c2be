// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fmt;
use std::str::FromStr;

use crate::error::SentinelError;

/// Which pose elements are drawn on annotated frames.
///
/// Parsed from a comma-separated list of `links`, `keypoints`, `boxes` or
/// `none`. The frame status is drawn regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    /// Skeleton limbs between keypoints.
    pub links: bool,
    /// Keypoint markers.
    pub keypoints: bool,
    /// Detection bounding boxes.
    pub boxes: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            links: true,
            keypoints: true,
            boxes: false,
        }
    }
}

impl Overlay {
    /// Draw no pose elements.
    pub const NONE: Self = Self {
        links: false,
        keypoints: false,
        boxes: false,
    };

    /// Draw every pose element.
    pub const ALL: Self = Self {
        links: true,
        keypoints: true,
        boxes: true,
    };

    /// Whether nothing but the status is drawn.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        !self.links && !self.keypoints && !self.boxes
    }
}

impl FromStr for Overlay {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut overlay = Self::NONE;
        for flag in s.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            match flag.to_lowercase().as_str() {
                "links" => overlay.links = true,
                "keypoints" => overlay.keypoints = true,
                "boxes" | "box" => overlay.boxes = true,
                "none" => overlay = Self::NONE,
                _ => {
                    return Err(SentinelError::ConfigError(format!(
                        "invalid overlay flag '{flag}', expected: links, keypoints, boxes, none"
                    )));
                }
            }
        }
        Ok(overlay)
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("none");
        }
        let flags: Vec<&str> = [
            (self.links, "links"),
            (self.keypoints, "keypoints"),
            (self.boxes, "boxes"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        f.write_str(&flags.join(","))
    }
}
