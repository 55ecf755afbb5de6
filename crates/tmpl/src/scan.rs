//! Template tag scanning
//!
//! Splits template text into literal runs and embedded tags before
//! evaluation.
//!
//! # Tag Formats
//!
//! - `<%= expression %>` - the expression's value is interpolated
//! - `<% code %>` - code executed for effect; control flow may span tags
//! - `<%# comment %>` - dropped from the output
//!
//! # Escaping
//!
//! `<%%` produces a literal `<%` in the output. `%>` outside a tag needs no
//! escaping.
//!
//! # Example
//!
//! ```
//! use runner_tmpl::{scan, Segment};
//!
//! let segments = scan("listen=<%= config.port %>").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Literal("listen=".to_string()),
//!     Segment::Expr("config.port".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// A segment of scanned template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, copied to the output verbatim
    Literal(String),

    /// `<%= ... %>`: expression whose value is interpolated
    Expr(String),

    /// `<% ... %>`: code executed without producing output directly
    Code(String),
}

/// Errors that can occur while scanning template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unclosed tag starting at byte {0}")]
    Unclosed(usize),
}

enum TagKind {
    Expr,
    Code,
    Comment,
}

/// Scan template text into segments.
///
/// A tag that is never closed with `%>` is an error carrying the byte
/// offset of its opening delimiter; nothing is dropped silently.
pub fn scan(input: &str) -> Result<Vec<Segment>, ScanError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;
    let mut offset = 0usize;

    while let Some(start) = rest.find("<%") {
        let after_open = &rest[start + 2..];

        // `<%%` escapes to a literal `<%`
        if let Some(tail) = after_open.strip_prefix('%') {
            literal.push_str(&rest[..start]);
            literal.push_str("<%");
            offset += start + 3;
            rest = tail;
            continue;
        }

        literal.push_str(&rest[..start]);

        let (kind, marker_len) = match after_open.as_bytes().first() {
            Some(b'=') => (TagKind::Expr, 1),
            Some(b'#') => (TagKind::Comment, 1),
            _ => (TagKind::Code, 0),
        };
        let body = &after_open[marker_len..];

        let close = body
            .find("%>")
            .ok_or(ScanError::Unclosed(offset + start))?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let content = body[..close].trim();
        match kind {
            TagKind::Expr => segments.push(Segment::Expr(content.to_string())),
            TagKind::Code => segments.push(Segment::Code(content.to_string())),
            TagKind::Comment => {}
        }

        let consumed = start + 2 + marker_len + close + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}
