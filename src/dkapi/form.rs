//! Login form scraping.
//!
//! The authorization page is a plain HTML login form; all we need from it is
//! the `action` attribute of its `<form>` tag. When the page carries several
//! forms the last one wins, matching how a browser-driven login would submit
//! the final form on the page.

use crate::error::{DkapiError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn form_tag() -> &'static Regex {
    static FORM_TAG: OnceLock<Regex> = OnceLock::new();
    FORM_TAG.get_or_init(|| {
        Regex::new(r"(?is)<form\b[^>]*>").expect("form tag pattern is valid")
    })
}

fn action_attr() -> &'static Regex {
    static ACTION: OnceLock<Regex> = OnceLock::new();
    ACTION.get_or_init(|| {
        Regex::new(r#"(?is)\saction\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
            .expect("action attribute pattern is valid")
    })
}

/// Extract the `action` of the last `<form>` element in `html`.
pub fn extract_form_action(html: &str) -> Result<String> {
    form_tag()
        .find_iter(html)
        .filter_map(|tag| {
            action_attr().captures(tag.as_str()).and_then(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| decode_entities(m.as_str()))
            })
        })
        .last()
        .ok_or(DkapiError::FormAction)
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
