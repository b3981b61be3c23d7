//! Context references in config strings.
//!
//! Config values may pull results of earlier nodes with
//! `{{context.<node_id>.<key>...}}` placeholders. The execution service
//! resolves them at run time; here they are only located so the validator
//! can warn about references to nodes that will not have run yet.

/// A `{{context.<node_id>.<path>}}` placeholder found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextReference<'a> {
    /// The full placeholder text, braces included.
    pub raw: &'a str,
    /// The node whose result is referenced.
    pub node_id: &'a str,
    /// Dotted path into that node's result.
    pub path: &'a str,
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const SCOPE: &str = "context";

/// Finds every context reference in `text`, in order of appearance.
///
/// Placeholders that are not context references, or that name no key
/// after the node id, are skipped.
#[must_use]
pub fn context_references(text: &str) -> Vec<ContextReference<'_>> {
    let mut references = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        let body_start = start + OPEN.len();
        let Some(length) = rest[body_start..].find(CLOSE) else {
            break;
        };
        let body_end = body_start + length;
        let end = body_end + CLOSE.len();

        if let Some((node_id, path)) = parse_body(rest[body_start..body_end].trim()) {
            references.push(ContextReference {
                raw: &text[offset + start..offset + end],
                node_id,
                path,
            });
        }

        offset += end;
        rest = &rest[end..];
    }
    references
}

fn parse_body(body: &str) -> Option<(&str, &str)> {
    let mut parts = body.splitn(3, '.');
    if parts.next()? != SCOPE {
        return None;
    }
    let node_id = parts.next().filter(|id| !id.is_empty())?;
    let path = parts.next().filter(|path| !path.is_empty())?;
    Some((node_id, path))
}
