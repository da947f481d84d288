//! Properties panel contract.
//!
//! The panel holds no state of its own. It reads a [`PanelView`] of the
//! selected element and sends [`PanelEdit`]s back through the same update
//! path the pointer controller uses.

use serde::{Deserialize, Serialize};

use crate::interaction::SizeLimits;
use crate::{Element, ElementId, ElementKind, ElementPatch, Style};

/// Font size choices, as (CSS value, label).
pub const FONT_SIZE_OPTIONS: [(&str, &str); 9] = [
    ("0.75rem", "12px"),
    ("0.875rem", "14px"),
    ("1rem", "16px"),
    ("1.125rem", "18px"),
    ("1.25rem", "20px"),
    ("1.5rem", "24px"),
    ("2rem", "32px"),
    ("2.5rem", "40px"),
    ("3rem", "48px"),
];

/// Border radius choices, as (CSS value, label).
pub const BORDER_RADIUS_OPTIONS: [(&str, &str); 5] = [
    ("0px", "None"),
    ("4px", "Small"),
    ("8px", "Medium"),
    ("12px", "Large"),
    ("50%", "Circle"),
];

const FALLBACK_FONT_SIZE: &str = "1rem";
const FALLBACK_COLOR: &str = "#000000";
const FALLBACK_BACKGROUND: &str = "#ffffff";
const FALLBACK_RADIUS: &str = "0px";

/// Numeric geometry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericField {
    /// X position.
    X,
    /// Y position.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
}

impl NumericField {
    /// Value used when input is empty, non-numeric or zero.
    #[must_use]
    pub fn fallback(self, limits: SizeLimits) -> f32 {
        match self {
            Self::X | Self::Y => 0.0,
            Self::Width => limits.min_width,
            Self::Height => limits.min_height,
        }
    }

    /// Interpret raw input for this field.
    #[must_use]
    pub fn value_from_input(self, input: &str, limits: SizeLimits) -> f32 {
        match parse_integer_prefix(input) {
            Some(value) if value != 0 => {
                #[allow(clippy::cast_precision_loss)]
                let value = value as f32;
                value.max(0.0)
            }
            _ => self.fallback(limits),
        }
    }
}

/// Parse the leading integer of `input`: optional whitespace, optional
/// sign, then digits. Anything after the digits is ignored.
#[must_use]
pub fn parse_integer_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// A single edit issued by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum PanelEdit {
    /// Replace content.
    Content(String),
    /// Raw numeric input for a geometry field.
    Numeric {
        /// Which field.
        field: NumericField,
        /// Text as typed.
        input: String,
    },
    /// Set the font size.
    FontSize(String),
    /// Set the text color.
    Color(String),
    /// Set the background color.
    BackgroundColor(String),
    /// Set the border radius.
    BorderRadius(String),
}

impl PanelEdit {
    /// Translate into an element patch.
    #[must_use]
    pub fn to_patch(&self, limits: SizeLimits) -> ElementPatch {
        match self {
            Self::Content(content) => ElementPatch::content(content.clone()),
            Self::Numeric { field, input } => {
                let value = Some(field.value_from_input(input, limits));
                match field {
                    NumericField::X => ElementPatch {
                        x: value,
                        ..ElementPatch::default()
                    },
                    NumericField::Y => ElementPatch {
                        y: value,
                        ..ElementPatch::default()
                    },
                    NumericField::Width => ElementPatch {
                        width: value,
                        ..ElementPatch::default()
                    },
                    NumericField::Height => ElementPatch {
                        height: value,
                        ..ElementPatch::default()
                    },
                }
            }
            Self::FontSize(v) => style_patch(|s| s.font_size = Some(v.clone())),
            Self::Color(v) => style_patch(|s| s.color = Some(v.clone())),
            Self::BackgroundColor(v) => style_patch(|s| s.background_color = Some(v.clone())),
            Self::BorderRadius(v) => style_patch(|s| s.border_radius = Some(v.clone())),
        }
    }
}

/// What the panel shows for the selected element.
///
/// Typography fields are present only for text-bearing kinds, background
/// only for kinds other than plain text; border radius applies to all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    /// Element ID.
    pub id: ElementId,
    /// Element kind.
    pub kind: ElementKind,
    /// Badge text, e.g. `Button`.
    pub kind_label: String,
    /// Content.
    pub content: String,
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Font size, for text-bearing kinds.
    pub font_size: Option<String>,
    /// Text color, for text-bearing kinds.
    pub color: Option<String>,
    /// Background color, for non-text kinds.
    pub background_color: Option<String>,
    /// Border radius.
    pub border_radius: String,
}

impl PanelView {
    /// Build the view for `element`.
    #[must_use]
    pub fn of(element: &Element) -> Self {
        let style = &element.style;
        let typography = element.kind.is_text_bearing();
        let shows_background = element.kind != ElementKind::Text;
        let or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };

        Self {
            id: element.id,
            kind: element.kind,
            kind_label: capitalize(element.kind.as_str()),
            content: element.content.clone(),
            x: element.geometry.x,
            y: element.geometry.y,
            width: element.geometry.width,
            height: element.geometry.height,
            font_size: typography.then(|| or(&style.font_size, FALLBACK_FONT_SIZE)),
            color: typography.then(|| or(&style.color, FALLBACK_COLOR)),
            background_color: shows_background
                .then(|| or(&style.background_color, FALLBACK_BACKGROUND)),
            border_radius: or(&style.border_radius, FALLBACK_RADIUS),
        }
    }
}

fn style_patch(edit: impl FnOnce(&mut Style)) -> ElementPatch {
    let mut style = Style::default();
    edit(&mut style);
    ElementPatch::style(style)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
