//! Template filling and escaping for the generated HTML pages.

use crate::error::{Error, Result};

/// Substitute `{{KEY}}` placeholders in `template` in a single pass.
///
/// Substituted values are never rescanned, so a value that happens to
/// contain `{{...}}` is emitted verbatim.
pub(crate) fn fill_template(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| Error::Render("unterminated template placeholder".to_string()))?;
        let key = &after[..end];
        let value = values
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(*v))
            .ok_or_else(|| Error::Render(format!("unknown template placeholder: {key}")))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Escape text for an HTML element body or attribute.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make serialized JSON safe to embed in a `<script>` element.
///
/// `</` cannot appear in the output, so the data cannot close the element.
pub(crate) fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
