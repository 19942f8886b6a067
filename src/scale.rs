use serde_json::Value;

/// Value-to-text mapping for one field, resolved by the owning chart and
/// handed to the label pipeline.
pub trait Scale {
    fn field(&self) -> &str;

    /// Render one field value as label text. `None` means the value has no
    /// textual representation and its label must be skipped.
    fn get_text(&self, value: &Value) -> Option<String>;
}

/// Plain formatting scale: strings pass through, numbers print trimmed,
/// null and missing values produce no text.
pub struct TextScale {
    field: String,
    formatter: Option<Box<dyn Fn(&Value) -> Option<String>>>,
}

impl TextScale {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            formatter: None,
        }
    }

    pub fn with_formatter(
        field: impl Into<String>,
        formatter: impl Fn(&Value) -> Option<String> + 'static,
    ) -> Self {
        Self {
            field: field.into(),
            formatter: Some(Box::new(formatter)),
        }
    }
}

impl Scale for TextScale {
    fn field(&self) -> &str {
        &self.field
    }

    fn get_text(&self, value: &Value) -> Option<String> {
        if let Some(formatter) = &self.formatter {
            return formatter(value);
        }
        match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_scale_formats_primitives() {
        let scale = TextScale::new("value");
        assert_eq!(scale.get_text(&json!("beijing")).as_deref(), Some("beijing"));
        assert_eq!(scale.get_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(scale.get_text(&json!(null)), None);
    }

    #[test]
    fn custom_formatter_wins() {
        let scale = TextScale::with_formatter("value", |v| {
            v.as_f64().map(|n| format!("{n:.1}%"))
        });
        assert_eq!(scale.get_text(&json!(12.34)).as_deref(), Some("12.3%"));
    }
}
