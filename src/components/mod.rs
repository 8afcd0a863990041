//! Presentational components for the auth pages.
//!
//! Every component is a plain value rendered to an HTML fragment. State and
//! validation live in the parent form; components only render what they are
//! given and forward change notifications to the callbacks they hold.

pub mod footer;
pub mod form_error;
pub mod form_input;
pub mod terms_agreement;

use actix_web::{body::BoxBody, http::header::ContentType, HttpRequest, HttpResponse, Responder};

pub use footer::Footer;
pub use form_error::FormError;
pub use form_input::{FormInput, InputType};
pub use terms_agreement::TermsAgreement;

/// Callback a parent form hands to a component.
pub type ChangeHandler<T> = Box<dyn Fn(T)>;

pub trait Component {
    /// Renders the component to an HTML fragment. May be empty.
    fn render(&self) -> String;
}

/// Serves a component as a `text/html` response.
pub struct Html<C>(pub C);

impl<C: Component> Responder for Html<C> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(self.0.render())
    }
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
