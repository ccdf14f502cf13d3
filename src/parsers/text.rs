/// Collapses every run of whitespace into a single space and trims the ends
///
/// Newlines, tabs and non-breaking spaces all count as whitespace, so text
/// gathered line by line ends up as one flat line.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Appends a trimmed chunk of text followed by a newline
pub fn push_line(buffer: &mut String, chunk: &str) {
    buffer.push_str(chunk.trim());
    buffer.push('\n');
}
