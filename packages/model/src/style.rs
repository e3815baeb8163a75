//! Shared text style carried on `props.style` by text-bearing elements.

use crate::element::Props;
use serde_json::Value;

/// Text style; every field is optional and falls back to the per-type
/// defaults at render time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_decoration: Option<String>,
    pub color: Option<String>,
    pub text_align: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
}

impl TextStyle {
    /// Read `props.style`. Numbers are accepted (`fontSize: 24` reads as
    /// `"24px"`, `lineHeight: 1.5` stays unitless); anything else is ignored.
    pub fn from_props(props: &Props) -> Self {
        let Some(Value::Object(style)) = props.get("style") else {
            return Self::default();
        };

        let read = |key: &str, unit: &str| -> Option<String> {
            match style.get(key)? {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(format!("{}{}", n, unit)),
                _ => None,
            }
        };

        Self {
            font_family: read("fontFamily", ""),
            font_size: read("fontSize", "px"),
            font_weight: read("fontWeight", ""),
            font_style: read("fontStyle", ""),
            text_decoration: read("textDecoration", ""),
            color: read("color", ""),
            text_align: read("textAlign", ""),
            line_height: read("lineHeight", ""),
            letter_spacing: read("letterSpacing", "px"),
        }
    }

    /// Fill every unset field from `defaults`
    pub fn merged_over(&self, defaults: &TextStyle) -> TextStyle {
        fn pick(own: &Option<String>, fallback: &Option<String>) -> Option<String> {
            own.clone().or_else(|| fallback.clone())
        }

        TextStyle {
            font_family: pick(&self.font_family, &defaults.font_family),
            font_size: pick(&self.font_size, &defaults.font_size),
            font_weight: pick(&self.font_weight, &defaults.font_weight),
            font_style: pick(&self.font_style, &defaults.font_style),
            text_decoration: pick(&self.text_decoration, &defaults.text_decoration),
            color: pick(&self.color, &defaults.color),
            text_align: pick(&self.text_align, &defaults.text_align),
            line_height: pick(&self.line_height, &defaults.line_height),
            letter_spacing: pick(&self.letter_spacing, &defaults.letter_spacing),
        }
    }

    /// CSS property/value pairs for every set field, in a fixed order
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("font-family", &self.font_family),
            ("font-size", &self.font_size),
            ("font-weight", &self.font_weight),
            ("font-style", &self.font_style),
            ("text-decoration", &self.text_decoration),
            ("color", &self.color),
            ("text-align", &self.text_align),
            ("line-height", &self.line_height),
            ("letter-spacing", &self.letter_spacing),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone())))
            .collect()
    }
}
