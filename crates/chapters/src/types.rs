use std::fmt;

use serde::Serialize;

/// A font size rounded to one decimal place, stored as tenths of a point.
///
/// Rounding absorbs renderer jitter (10.04 and 9.96 are both 10.0) and gives
/// an exact, hashable key for the size histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "f64")]
pub struct FontSize(u32);

impl FontSize {
    pub fn from_points(points: f32) -> Self {
        FontSize((points.max(0.0) * 10.0).round() as u32)
    }

    pub fn points(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl From<FontSize> for f64 {
    fn from(size: FontSize) -> Self {
        size.points()
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Occurrence statistics for one rounded font size.
#[derive(Debug, Clone, Serialize)]
pub struct FontSizeStats {
    pub size: FontSize,
    /// Number of non-empty spans set in this size.
    pub count: usize,
    /// Up to `samples_per_size` example texts, in reading order.
    pub samples: Vec<String>,
}

/// Document-wide font profile used to tell body text from headings.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentLayoutProfile {
    /// The most frequent size, assumed to be body text.
    pub main_font_size: FontSize,
    /// Larger, rarer sizes, ascending.
    pub header_font_sizes: Vec<FontSize>,
    /// Every observed size in first-seen order.
    pub font_samples: Vec<FontSizeStats>,
}

impl DocumentLayoutProfile {
    pub fn is_header_size(&self, size: FontSize) -> bool {
        self.header_font_sizes.binary_search(&size).is_ok()
    }
}

/// One extracted chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    pub body: String,
    /// 1-based page where the heading was found; 0 when unknown.
    pub page: usize,
}

impl Chapter {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            page: 0,
        }
    }

    /// Body length in characters, the unit of the minimum-length filter.
    pub fn len(&self) -> usize {
        self.body.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
