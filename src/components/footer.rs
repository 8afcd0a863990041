use chrono::{Datelike, Local};

use super::{
    escape,
    terms_agreement::{PRIVACY_PATH, TERMS_PATH},
    Component,
};

pub const SITE_NAME: &str = "TaskMarket";

const LINKS: &[(&str, &str)] = &[
    ("About", "/about"),
    ("How it works", "/how-it-works"),
    ("Terms of Service", TERMS_PATH),
    ("Privacy Policy", PRIVACY_PATH),
    ("Contact", "/contact"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub year: i32,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            year: Local::now().year(),
        }
    }
}

impl Component for Footer {
    fn render(&self) -> String {
        let links: String = LINKS
            .iter()
            .map(|(label, href)| format!(r#"<li><a href="{}">{}</a></li>"#, href, escape(label)))
            .collect();
        format!(
            r#"<footer class="site-footer"><nav><ul>{}</ul></nav><p>&copy; {} {}. All rights reserved.</p></footer>"#,
            links, self.year, SITE_NAME
        )
    }
}
