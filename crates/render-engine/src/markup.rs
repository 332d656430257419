//! Value formatting shared by the markup templates.
//!
//! Entity escaping is left to askama; these helpers only keep values from
//! breaking out of the CSS or SVG syntax they are embedded in.

/// Text with control characters removed; XML rejects most of them.
pub fn plain_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect()
}

/// A font family name safe inside a quoted CSS/SVG attribute.
pub fn family_list(family: &str) -> String {
    let cleaned: String = family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '<' | '>' | '\\' | '{' | '}') && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == crate::fonts::GENERIC_FAMILY {
        crate::fonts::GENERIC_FAMILY.to_string()
    } else {
        format!("'{cleaned}', {}", crate::fonts::GENERIC_FAMILY)
    }
}

/// A reference safe inside CSS `url('...')` within a double-quoted attribute.
pub fn css_url(reference: &str) -> String {
    let mut out = String::with_capacity(reference.len());
    for c in reference.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            c if c.is_whitespace() || c.is_control() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

/// Format a coordinate with at most two decimals, without trailing zeros.
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
