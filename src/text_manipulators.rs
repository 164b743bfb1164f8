use scraper::ElementRef;

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>()
}

/// Cell text as a spreadsheet should see it: whitespace runs (including
/// `&nbsp;`) collapsed to a single space, ends trimmed.
pub fn extract_clean_text(node: ElementRef) -> String {
    collapse_whitespace(&extract_text(node))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
