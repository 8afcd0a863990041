use super::{ChangeHandler, Component};

pub const TERMS_PATH: &str = "/terms";
pub const PRIVACY_PATH: &str = "/privacy";

/// The "I agree" checkbox on the signup form.
pub struct TermsAgreement {
    checked: bool,
    on_change: Option<ChangeHandler<bool>>,
}

impl TermsAgreement {
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            on_change: None,
        }
    }

    pub fn on_change(mut self, handler: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Reports the flipped state to the parent.
    pub fn toggle(&self) {
        if let Some(handler) = &self.on_change {
            handler(!self.checked);
        }
    }
}

impl Component for TermsAgreement {
    fn render(&self) -> String {
        let checked = if self.checked { " checked" } else { "" };
        format!(
            concat!(
                r#"<div class="terms-agreement">"#,
                r#"<input id="terms" name="terms" type="checkbox"{} required>"#,
                r#"<label for="terms">I agree to the <a href="{}">Terms of Service</a>"#,
                r#" and <a href="{}">Privacy Policy</a></label></div>"#
            ),
            checked, TERMS_PATH, PRIVACY_PATH
        )
    }
}
