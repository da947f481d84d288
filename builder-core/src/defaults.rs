//! Per-kind defaults.
//!
//! One declarative table drives creation-time content, size and style, and
//! the render-time fallback for style keys an element leaves unset.

use serde::{Deserialize, Serialize};

use crate::{ElementKind, Style};

/// Style values a kind starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDefaults {
    /// CSS font size.
    pub font_size: Option<&'static str>,
    /// CSS text color.
    pub color: Option<&'static str>,
    /// CSS background color.
    pub background_color: Option<&'static str>,
    /// CSS border radius.
    pub border_radius: Option<&'static str>,
    /// CSS font weight.
    pub font_weight: Option<&'static str>,
}

impl StyleDefaults {
    const NONE: Self = Self {
        font_size: None,
        color: None,
        background_color: None,
        border_radius: None,
        font_weight: None,
    };

    /// Materialize into an owned sparse [`Style`].
    #[must_use]
    pub fn to_style(&self) -> Style {
        Style {
            font_size: self.font_size.map(str::to_string),
            color: self.color.map(str::to_string),
            background_color: self.background_color.map(str::to_string),
            border_radius: self.border_radius.map(str::to_string),
            font_weight: self.font_weight.map(str::to_string),
            ..Style::default()
        }
    }
}

/// Creation defaults for one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDefaults {
    /// Initial content.
    pub content: &'static str,
    /// Initial width in pixels.
    pub width: f32,
    /// Initial height in pixels.
    pub height: f32,
    /// Initial style.
    pub style: StyleDefaults,
    /// Name shown in palettes and layer lists.
    pub display_name: &'static str,
}

const TEXT: KindDefaults = KindDefaults {
    content: "Edit this text",
    width: 200.0,
    height: 24.0,
    style: StyleDefaults {
        font_size: Some("1rem"),
        color: Some("#000000"),
        ..StyleDefaults::NONE
    },
    display_name: "Text",
};

const HEADING: KindDefaults = KindDefaults {
    content: "Your Heading",
    width: 300.0,
    height: 40.0,
    style: StyleDefaults {
        font_size: Some("1.5rem"),
        color: Some("#000000"),
        font_weight: Some("bold"),
        ..StyleDefaults::NONE
    },
    display_name: "Heading",
};

const BUTTON: KindDefaults = KindDefaults {
    content: "Click Me",
    width: 120.0,
    height: 40.0,
    style: StyleDefaults {
        font_size: Some("0.875rem"),
        color: Some("#ffffff"),
        background_color: Some("#3b82f6"),
        border_radius: Some("6px"),
        font_weight: None,
    },
    display_name: "Button",
};

const IMAGE: KindDefaults = KindDefaults {
    content: "Click to add image",
    width: 250.0,
    height: 150.0,
    style: StyleDefaults {
        background_color: Some("#f3f4f6"),
        ..StyleDefaults::NONE
    },
    display_name: "Image",
};

const SECTION: KindDefaults = KindDefaults {
    content: "Container",
    width: 400.0,
    height: 200.0,
    style: StyleDefaults {
        background_color: Some("#f9fafb"),
        border_radius: Some("8px"),
        ..StyleDefaults::NONE
    },
    display_name: "Container",
};

const SHAPE: KindDefaults = KindDefaults {
    content: "",
    width: 100.0,
    height: 100.0,
    style: StyleDefaults {
        background_color: Some("#3b82f6"),
        border_radius: Some("50%"),
        ..StyleDefaults::NONE
    },
    display_name: "Shape",
};

const DIVIDER: KindDefaults = KindDefaults {
    content: "",
    width: 300.0,
    height: 2.0,
    style: StyleDefaults {
        background_color: Some("#e5e7eb"),
        ..StyleDefaults::NONE
    },
    display_name: "Divider",
};

const SPACER: KindDefaults = KindDefaults {
    content: "",
    width: 100.0,
    height: 50.0,
    style: StyleDefaults {
        background_color: Some("transparent"),
        ..StyleDefaults::NONE
    },
    display_name: "Spacer",
};

/// Look up the defaults for a kind.
#[must_use]
pub const fn defaults_for(kind: ElementKind) -> &'static KindDefaults {
    match kind {
        ElementKind::Text => &TEXT,
        ElementKind::Heading => &HEADING,
        ElementKind::Button => &BUTTON,
        ElementKind::Image => &IMAGE,
        ElementKind::Section => &SECTION,
        ElementKind::Shape => &SHAPE,
        ElementKind::Divider => &DIVIDER,
        ElementKind::Spacer => &SPACER,
    }
}

/// A style with every renderable key filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    /// CSS font size.
    pub font_size: String,
    /// CSS text color.
    pub color: String,
    /// CSS background color.
    pub background_color: String,
    /// CSS border radius.
    pub border_radius: String,
    /// CSS font weight.
    pub font_weight: String,
    /// CSS text alignment.
    pub text_align: String,
    /// CSS padding.
    pub padding: String,
    /// CSS margin.
    pub margin: String,
}

impl Style {
    /// Fill unset keys from the kind's table entry, then from neutral CSS
    /// values.
    #[must_use]
    pub fn resolve(&self, kind: ElementKind) -> ResolvedStyle {
        let base = defaults_for(kind).style;
        let pick = |own: &Option<String>, table: Option<&'static str>, neutral: &str| {
            own.clone()
                .or_else(|| table.map(str::to_string))
                .unwrap_or_else(|| neutral.to_string())
        };

        ResolvedStyle {
            font_size: pick(&self.font_size, base.font_size, "1rem"),
            color: pick(&self.color, base.color, "#000000"),
            background_color: pick(&self.background_color, base.background_color, "transparent"),
            border_radius: pick(&self.border_radius, base.border_radius, "0px"),
            font_weight: pick(&self.font_weight, base.font_weight, "normal"),
            text_align: pick(&self.text_align, None, "center"),
            padding: pick(&self.padding, None, "0px"),
            margin: pick(&self.margin, None, "0px"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let d = defaults_for(ElementKind::Text);
        assert_eq!(d.content, "Edit this text");
        assert!((d.width - 200.0).abs() < f32::EPSILON);
        assert!((d.height - 24.0).abs() < f32::EPSILON);
        assert_eq!(d.style.font_size, Some("1rem"));
    }

    #[test]
    fn test_textless_kinds_start_empty() {
        for kind in [ElementKind::Shape, ElementKind::Divider, ElementKind::Spacer] {
            assert!(defaults_for(kind).content.is_empty(), "{kind} should have no content");
        }
    }

    #[test]
    fn test_every_kind_has_positive_size() {
        for kind in ElementKind::ALL {
            let d = defaults_for(kind);
            assert!(d.width > 0.0 && d.height > 0.0, "{kind} has empty default size");
        }
    }

    #[test]
    fn test_heading_is_bold() {
        let style = defaults_for(ElementKind::Heading).style.to_style();
        assert_eq!(style.font_weight.as_deref(), Some("bold"));
        assert!(style.background_color.is_none());
    }

    #[test]
    fn test_resolve_prefers_own_value_then_table() {
        let style = Style {
            background_color: Some("#ff0000".to_string()),
            ..Style::default()
        };
        let resolved = style.resolve(ElementKind::Shape);
        assert_eq!(resolved.background_color, "#ff0000");
        assert_eq!(resolved.border_radius, "50%");
        assert_eq!(resolved.margin, "0px");
    }
}
