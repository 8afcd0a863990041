use super::{escape, ChangeHandler, Component};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputType {
    #[default]
    Text,
    Email,
    Password,
    Date,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::Date => "date",
        }
    }
}

/// A labelled form field.
///
/// The value is owned by the parent form; edits are reported through
/// [`FormInput::change`] and never applied here.
pub struct FormInput {
    id: String,
    label: String,
    input_type: InputType,
    value: String,
    placeholder: Option<String>,
    required: bool,
    on_change: Option<ChangeHandler<String>>,
}

impl FormInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input_type: InputType::default(),
            value: String::new(),
            placeholder: None,
            required: false,
            on_change: None,
        }
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(String) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    /// Forwards a new value to the parent.
    pub fn change(&self, value: &str) {
        if let Some(handler) = &self.on_change {
            handler(value.to_string());
        }
    }
}

impl Component for FormInput {
    fn render(&self) -> String {
        let id = escape(&self.id);
        let mut input = format!(
            r#"<input id="{id}" name="{id}" type="{}" value="{}""#,
            self.input_type.as_str(),
            escape(&self.value)
        );
        if let Some(placeholder) = &self.placeholder {
            input.push_str(&format!(r#" placeholder="{}""#, escape(placeholder)));
        }
        if self.required {
            input.push_str(" required");
        }
        input.push('>');

        format!(
            r#"<div class="form-group"><label for="{id}">{}</label>{input}</div>"#,
            escape(&self.label)
        )
    }
}
