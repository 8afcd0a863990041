use super::{escape, Component};

/// Error banner shown above a form. An empty message renders nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormError {
    pub error: String,
}

impl FormError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl Component for FormError {
    fn render(&self) -> String {
        if self.error.is_empty() {
            return String::new();
        }
        format!(
            r#"<div class="form-error" role="alert">{}</div>"#,
            escape(&self.error)
        )
    }
}
