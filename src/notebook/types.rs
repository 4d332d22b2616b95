//! Notebook types
//!
//! Page geometry primitives and the validated request options that drive the
//! layout transform.

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::error::{NotebookError, NotebookResult};

/// Default pitch between repeated pattern elements, in points
pub const DEFAULT_SPACING: u32 = 20;

/// Page dimensions in PDF points (72 points = 1 inch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Rectangle in page coordinates (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlapping region with positive area, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Which half of the doubled canvas holds the original slide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl Placement {
    pub const ALL: [Placement; 4] = [
        Placement::Left,
        Placement::Right,
        Placement::Top,
        Placement::Bottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Left => "left",
            Placement::Right => "right",
            Placement::Top => "top",
            Placement::Bottom => "bottom",
        }
    }

    /// True when the canvas is doubled horizontally
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Placement::Left | Placement::Right)
    }
}

impl FromStr for Placement {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Placement::Left),
            "right" => Ok(Placement::Right),
            "top" => Ok(Placement::Top),
            "bottom" => Ok(Placement::Bottom),
            _ => Err(NotebookError::InvalidPlacement(s.to_string())),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Note-taking pattern drawn in the note region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStyle {
    #[default]
    Lines,
    Dots,
    Squares,
}

impl PatternStyle {
    pub const ALL: [PatternStyle; 3] = [PatternStyle::Lines, PatternStyle::Dots, PatternStyle::Squares];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternStyle::Lines => "lines",
            PatternStyle::Dots => "dots",
            PatternStyle::Squares => "squares",
        }
    }
}

impl FromStr for PatternStyle {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" => Ok(PatternStyle::Lines),
            "dots" => Ok(PatternStyle::Dots),
            "squares" => Ok(PatternStyle::Squares),
            _ => Err(NotebookError::UnknownStyle(s.to_string())),
        }
    }
}

impl fmt::Display for PatternStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positive pitch between pattern elements, in points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Spacing(u32);

impl Spacing {
    pub fn new(value: i64) -> NotebookResult<Self> {
        if value <= 0 || value > u32::MAX as i64 {
            return Err(NotebookError::InvalidSpacing(value.to_string()));
        }
        Ok(Self(value as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn as_f32(&self) -> f32 {
        self.0 as f32
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self(DEFAULT_SPACING)
    }
}

impl TryFrom<i64> for Spacing {
    type Error = NotebookError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Spacing::new(value)
    }
}

impl From<Spacing> for u32 {
    fn from(spacing: Spacing) -> Self {
        spacing.0
    }
}

impl FromStr for Spacing {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| NotebookError::InvalidSpacing(s.to_string()))?;
        Spacing::new(value)
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated options for one batch request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookOptions {
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub style: PatternStyle,
    #[serde(default)]
    pub spacing: Spacing,
}

impl NotebookOptions {
    /// Build options from raw request values, defaulting absent ones
    ///
    /// Empty strings count as absent, matching how browsers submit an
    /// untouched form field.
    pub fn parse(
        placement: Option<&str>,
        style: Option<&str>,
        spacing: Option<&str>,
    ) -> NotebookResult<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        Ok(Self {
            placement: present(placement)
                .map(str::parse::<Placement>)
                .transpose()?
                .unwrap_or_default(),
            style: present(style)
                .map(str::parse::<PatternStyle>)
                .transpose()?
                .unwrap_or_default(),
            spacing: present(spacing)
                .map(str::parse::<Spacing>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Rasterized bitmap of one source page
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Zero-based index of the source page
    pub index: usize,
    pub image: RgbImage,
}

/// One finished notebook page: background, pattern and slide composited
#[derive(Debug, Clone)]
pub struct OutputPage {
    /// Zero-based index of the source page
    pub index: usize,
    /// Canvas size in points
    pub size: PageSize,
    pub image: RgbImage,
}

/// Serialized notebook PDF for one uploaded file
#[derive(Debug, Clone)]
pub struct OutputDocument {
    /// Base file name of the corresponding input
    pub name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_parsing() {
        assert_eq!("left".parse::<Placement>().unwrap(), Placement::Left);
        assert_eq!(" Bottom ".parse::<Placement>().unwrap(), Placement::Bottom);
        assert!(matches!(
            "center".parse::<Placement>(),
            Err(NotebookError::InvalidPlacement(v)) if v == "center"
        ));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("dots".parse::<PatternStyle>().unwrap(), PatternStyle::Dots);
        assert_eq!("SQUARES".parse::<PatternStyle>().unwrap(), PatternStyle::Squares);
        assert!(matches!(
            "grid".parse::<PatternStyle>(),
            Err(NotebookError::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_spacing_must_be_positive() {
        assert_eq!(Spacing::new(20).unwrap().get(), 20);
        assert!(matches!(Spacing::new(0), Err(NotebookError::InvalidSpacing(_))));
        assert!(matches!(Spacing::new(-5), Err(NotebookError::InvalidSpacing(_))));
        assert!(matches!("abc".parse::<Spacing>(), Err(NotebookError::InvalidSpacing(_))));
        assert!(matches!("-1".parse::<Spacing>(), Err(NotebookError::InvalidSpacing(_))));
    }

    #[test]
    fn test_options_defaults() {
        let options = NotebookOptions::parse(None, Some(""), None).unwrap();
        assert_eq!(options.placement, Placement::Left);
        assert_eq!(options.style, PatternStyle::Lines);
        assert_eq!(options.spacing.get(), DEFAULT_SPACING);
    }

    #[test]
    fn test_options_reject_bad_values() {
        let err = NotebookOptions::parse(Some("top"), Some("dots"), Some("0")).unwrap_err();
        assert!(matches!(err, NotebookError::InvalidSpacing(_)));

        let err = NotebookOptions::parse(Some("diagonal"), None, None).unwrap_err();
        assert!(matches!(err, NotebookError::InvalidPlacement(_)));
    }

    #[test]
    fn test_options_deserialize() {
        let options: NotebookOptions =
            serde_json::from_str(r#"{"placement":"right","style":"squares","spacing":30}"#).unwrap();
        assert_eq!(options.placement, Placement::Right);
        assert_eq!(options.style, PatternStyle::Squares);
        assert_eq!(options.spacing.get(), 30);

        assert!(serde_json::from_str::<NotebookOptions>(r#"{"spacing":0}"#).is_err());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);

        assert!(a.intersection(&b).is_none());
        assert_eq!(a.intersection(&c), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }
}
