// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Classification output types.

use std::fmt;

/// Per-detection posture flags for one frame.
///
/// Entry `i` is `1` when detection `i` is in a wheelchair posture and `0` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultVector {
    flags: Vec<u8>,
}

impl ResultVector {
    /// Create a result vector from raw flags.
    #[must_use]
    pub const fn new(flags: Vec<u8>) -> Self {
        Self { flags }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Raw flags in detection order.
    #[must_use]
    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    /// Check whether detection `index` is flagged.
    #[must_use]
    pub fn is_wheelchair(&self, index: usize) -> bool {
        self.flags.get(index).is_some_and(|&f| f != 0)
    }

    /// Sum of all flags, i.e. the number of wheelchair postures.
    #[must_use]
    pub fn sum(&self) -> usize {
        self.flags.iter().map(|&f| usize::from(f)).sum()
    }

    /// Reduce to a frame-level status.
    #[must_use]
    pub fn status(&self) -> PostureStatus {
        if self.sum() > 0 {
            PostureStatus::WheelchairDetected
        } else {
            PostureStatus::Normal
        }
    }
}

impl From<Vec<bool>> for ResultVector {
    fn from(flags: Vec<bool>) -> Self {
        Self::new(flags.into_iter().map(u8::from).collect())
    }
}

impl fmt::Display for ResultVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.flags.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Frame-level posture status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureStatus {
    /// At least one person is in a wheelchair posture.
    WheelchairDetected,
    /// No person is in a wheelchair posture.
    Normal,
}

impl PostureStatus {
    /// Text overlaid on the frame and shown on the status bar.
    #[must_use]
    pub const fn wording(&self) -> &'static str {
        match self {
            Self::WheelchairDetected => "Wheelchair detected",
            Self::Normal => "Normal",
        }
    }

    /// Whether this status signals a detection.
    #[must_use]
    pub const fn is_detected(&self) -> bool {
        matches!(self, Self::WheelchairDetected)
    }
}

impl fmt::Display for PostureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wording())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reduction() {
        assert_eq!(ResultVector::new(vec![0, 0, 1]).status(), PostureStatus::WheelchairDetected);
        assert_eq!(ResultVector::new(vec![0, 0]).status(), PostureStatus::Normal);
        assert_eq!(ResultVector::default().status(), PostureStatus::Normal);
    }

    #[test]
    fn test_flags_access() {
        let results = ResultVector::from(vec![true, false, true]);
        assert_eq!(results.flags(), &[1, 0, 1]);
        assert_eq!(results.len(), 3);
        assert_eq!(results.sum(), 2);
        assert!(results.is_wheelchair(0));
        assert!(!results.is_wheelchair(1));
        assert!(!results.is_wheelchair(5));
    }

    #[test]
    fn test_display() {
        assert_eq!(ResultVector::new(vec![1, 0]).to_string(), "[1, 0]");
        assert_eq!(PostureStatus::WheelchairDetected.to_string(), "Wheelchair detected");
        assert_eq!(PostureStatus::Normal.to_string(), "Normal");
    }
}
