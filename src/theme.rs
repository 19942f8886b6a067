use serde::{Deserialize, Serialize};

use crate::scene::TextAlign;

/// Text style attributes carried onto label shapes. All fields are optional
/// so configured styles can merge over theme presets field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub text_align: Option<TextAlign>,
    pub line_width: Option<f32>,
}

impl TextStyle {
    /// Field-wise merge: values set on `self` win over `base`.
    pub fn merged_over(&self, base: &TextStyle) -> TextStyle {
        TextStyle {
            fill: self.fill.clone().or_else(|| base.fill.clone()),
            stroke: self.stroke.clone().or_else(|| base.stroke.clone()),
            font_size: self.font_size.or(base.font_size),
            font_family: self
                .font_family
                .clone()
                .or_else(|| base.font_family.clone()),
            text_align: self.text_align.or(base.text_align),
            line_width: self.line_width.or(base.line_width),
        }
    }
}

/// Style preset for one label placement context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTheme {
    /// Default distance between a label and its mark edge.
    pub offset: f32,
    pub style: TextStyle,
}

impl Default for LabelTheme {
    fn default() -> Self {
        Self {
            offset: 12.0,
            style: TextStyle {
                fill: Some("#545454".to_string()),
                font_size: Some(12.0),
                font_family: Some("sans-serif".to_string()),
                ..TextStyle::default()
            },
        }
    }
}

/// Label themes: `label` styles text placed beside a mark, `inner_labels`
/// styles text drawn over a filled mark and needs the contrasting fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub label: LabelTheme,
    pub inner_labels: LabelTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            label: LabelTheme::default(),
            inner_labels: LabelTheme {
                offset: 12.0,
                style: TextStyle {
                    fill: Some("#ffffff".to_string()),
                    font_size: Some(12.0),
                    font_family: Some("sans-serif".to_string()),
                    ..TextStyle::default()
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_over_prefers_own_fields() {
        let theme = LabelTheme::default().style;
        let configured = TextStyle {
            fill: Some("#ff0000".to_string()),
            ..TextStyle::default()
        };
        let merged = configured.merged_over(&theme);
        assert_eq!(merged.fill.as_deref(), Some("#ff0000"));
        assert_eq!(merged.font_size, Some(12.0), "unset fields fall back to theme");
    }

    #[test]
    fn default_themes_do_not_pin_alignment() {
        // Alignment must stay computed per position; a themed default would
        // override every positioner decision.
        let theme = Theme::default();
        assert!(theme.label.style.text_align.is_none());
        assert!(theme.inner_labels.style.text_align.is_none());
    }
}
