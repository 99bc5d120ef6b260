/// Lowercases the text and collapses every run of whitespace into a single space.
///
/// Byte-order marks and zero-width spaces left behind by PDF and DOCX extraction are
/// dropped first so they cannot split keywords.
pub fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00ad}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}
