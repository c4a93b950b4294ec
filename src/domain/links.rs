use std::sync::LazyLock;

use regex::Regex;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[\w-]+(\.[\w-]+)*(:[0-9]+)?(/[\w\-?=&%.]*)?")
        .expect("link pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment<'a> {
    Plain(&'a str),
    Link(&'a str),
}

/// Splits text into plain and link segments, keeping the original order.
pub fn segment_links(text: &str) -> Vec<TextSegment<'_>> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for found in LINK_PATTERN.find_iter(text) {
        if found.start() > last_end {
            segments.push(TextSegment::Plain(&text[last_end..found.start()]));
        }
        segments.push(TextSegment::Link(found.as_str()));
        last_end = found.end();
    }

    if last_end < text.len() {
        segments.push(TextSegment::Plain(&text[last_end..]));
    }

    segments
}

pub fn first_link(text: &str) -> Option<&str> {
    LINK_PATTERN.find(text).map(|found| found.as_str())
}
