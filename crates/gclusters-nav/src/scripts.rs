//! Script extraction from page fragments.
//!
//! Markup assigned to a mount point does not run its `<script>` elements,
//! so the navigator pulls them out of the fragment and hands each one to
//! the document for execution, in document order, with every attribute and
//! the inline text preserved.

/// One `<script>` element of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Attributes in source order, names lowercased. Valueless attributes
    /// carry an empty value.
    pub attributes: Vec<(String, String)>,
    /// Inline source text.
    pub text: String,
}

impl ScriptBlock {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// External source URL, if any.
    pub fn src(&self) -> Option<&str> {
        self.attribute("src")
    }

    pub fn is_external(&self) -> bool {
        self.src().is_some()
    }
}

/// Extract every `<script>` element of `html` in document order.
///
/// An unterminated script runs to the end of the input.
pub fn extract_scripts(html: &str) -> Vec<ScriptBlock> {
    let lower = html.to_ascii_lowercase();
    let mut scripts = Vec::new();
    let mut pos = 0;

    while let Some(found) = lower[pos..].find("<script") {
        let tag_start = pos + found;
        let after_name = tag_start + "<script".len();
        // `<scripts>` or `<script-x>` are other elements.
        let boundary = lower[after_name..].chars().next();
        if !matches!(boundary, Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace()) {
            pos = after_name;
            continue;
        }
        let Some(tag_len) = tag_end(&html[after_name..]) else {
            break;
        };
        let attrs_src = &html[after_name..after_name + tag_len];
        let body_start = after_name + tag_len + 1;
        let self_closing = attrs_src.trim_end().ends_with('/');
        let attrs_src = attrs_src.trim_end().trim_end_matches('/');

        let (text, next) = if self_closing {
            (String::new(), body_start)
        } else {
            match lower[body_start..].find("</script") {
                Some(close) => {
                    let body_end = body_start + close;
                    let after_close = lower[body_end..]
                        .find('>')
                        .map_or(lower.len(), |i| body_end + i + 1);
                    (html[body_start..body_end].to_string(), after_close)
                },
                None => (html[body_start..].to_string(), html.len()),
            }
        };

        scripts.push(ScriptBlock {
            attributes: parse_attributes(attrs_src),
            text,
        });
        pos = next;
    }
    scripts
}

/// Offset of the `>` closing a start tag, skipping quoted values.
fn tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {},
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            _ => {},
        }
    }
    None
}

fn parse_attributes(src: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = src.trim_start();
    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_ascii_lowercase();
        rest = rest[name_len..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    let end = inner.find(q).unwrap_or(inner.len());
                    rest = inner.get(end + 1..).unwrap_or("");
                    inner[..end].to_string()
                },
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    after_eq[..end].to_string()
                },
            }
        } else {
            String::new()
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
        rest = rest.trim_start();
    }
    attrs
}
