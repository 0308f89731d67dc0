use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strip anything that looks like markup from user input. Reset emails end
/// up echoed in admin views later, so they must never carry live HTML; the
/// same pass runs over submitted passwords as a conservative control.
pub fn strip_markup(input: &str) -> String {
    TAG_RE.replace_all(input, "").trim().to_string()
}
