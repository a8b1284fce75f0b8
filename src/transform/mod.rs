//! Source transformation
//!
//! Wraps plain CommonJS-style source files in a universal module
//! definition so the output loads under an AMD `define` as well as a
//! plain `require`. A leading copyright comment is lifted out of the body
//! and kept at the top of the wrapped file.

use tracing::debug;

use crate::utils::LINE_ENDING;

/// First line of the universal module boilerplate
pub const UMD_PROLOGUE: &str = "(function(define) { define(function(require, exports, module) {";

/// Last line of the universal module boilerplate
pub const UMD_EPILOGUE: &str = "}); })((typeof define === \"function\") ? define : function(factory) { factory(require, exports, module); });";

/// Indentation unit added in front of every body line
pub const INDENT: &str = "\t";

const COPYRIGHT_TOKEN: &str = "copyright";

/// Output of transforming one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    /// Wrapped source, ready to write
    pub wrapped_source: String,

    /// Extracted copyright comment, empty when the file has none
    pub header: String,
}

/// Source transformer
///
/// Records the header of every file it transforms, in order, so the
/// aggregate entry can tell whether all files share one header.
#[derive(Debug, Default)]
pub struct Transformer {
    headers: Vec<String>,
}

impl Transformer {
    /// Create a new transformer with no recorded headers
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform one source file
    pub fn transform(&mut self, source: &str) -> TransformResult {
        let (header, body) = match extract_copyright_header(source) {
            Some((header, body)) => (header, body),
            None => ("", source),
        };

        debug!("Wrapping {} bytes (header: {})", body.len(), !header.is_empty());

        self.headers.push(header.to_string());

        TransformResult {
            wrapped_source: umd_wrap(body, Some(header)),
            header: header.to_string(),
        }
    }

    /// Headers recorded so far, one per transformed file
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The header shared by every transformed file
    ///
    /// `None` when nothing was transformed or any two headers differ.
    /// When every file lacks a header this is `Some("")`.
    pub fn uniform_header(&self) -> Option<&str> {
        let (first, rest) = self.headers.split_first()?;
        rest.iter().all(|h| h == first).then_some(first.as_str())
    }
}

/// Whitespace as source files see it: Unicode spaces plus the byte order mark
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Split a leading copyright header off the source
///
/// The header is a run of block comments, separated only by whitespace,
/// that ends with the first comment containing "copyright" in any case.
/// Only whitespace may precede it. Returns the header verbatim and the
/// remaining source with the whitespace after the header removed.
pub fn extract_copyright_header(source: &str) -> Option<(&str, &str)> {
    let trimmed = source.trim_start_matches(is_space);
    let mut cursor = 0;

    loop {
        let rest = &trimmed[cursor..];
        let start = cursor + (rest.len() - rest.trim_start_matches(is_space).len());
        let inner = trimmed[start..].strip_prefix("/*")?;
        let end = start + inner.find("*/")? + 4;

        if trimmed[start..end].to_ascii_lowercase().contains(COPYRIGHT_TOKEN) {
            return Some((&trimmed[..end], trimmed[end..].trim_start_matches(is_space)));
        }
        cursor = end;
    }
}

/// Split text on `\r\n`, `\r` or `\n`
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    lines.push(&text[start..]);
    lines
}

/// A line is blank when it holds nothing but whitespace
pub fn is_blank(line: &str) -> bool {
    line.chars().all(is_space)
}

/// Drop blank lines from both ends
pub fn trim_blank_lines<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let start = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !is_blank(l)).map_or(start, |i| i + 1);
    &lines[start..end]
}

/// Indent a line by one unit; empty lines stay empty
pub fn indent_line(line: &str) -> String {
    if line.is_empty() {
        String::new()
    } else {
        format!("{}{}", INDENT, line)
    }
}

/// Wrap a body in the universal module boilerplate
///
/// The body is trimmed of surrounding blank lines and indented. A
/// non-empty header goes first, followed by a blank line.
pub fn umd_wrap(body: &str, header: Option<&str>) -> String {
    let lines = split_lines(body);
    let indented: Vec<String> = trim_blank_lines(&lines)
        .iter()
        .map(|line| indent_line(line))
        .collect();

    let mut buffer: Vec<&str> = Vec::with_capacity(7);
    if let Some(header) = header.filter(|h| !h.is_empty()) {
        buffer.push(header);
        buffer.push("");
    }

    let body = indented.join(LINE_ENDING);
    buffer.push(UMD_PROLOGUE);
    buffer.push("");
    buffer.push(&body);
    buffer.push("");
    buffer.push(UMD_EPILOGUE);

    let mut output = buffer.join(LINE_ENDING);
    output.push_str(LINE_ENDING);
    output
}
