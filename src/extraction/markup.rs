/*!
 * Tolerant markup scanning for description text.
 *
 * Description records embed HTML-style tags, most importantly `<i>` marking
 * Latin names. This scanner produces flat (text, is-italic) spans without
 * building a tree, and degrades gracefully on malformed input: a `<` that
 * never closes stays literal text, and an italic region only counts when
 * its closing tag actually appears, so unterminated tags degrade to "no
 * italics found" rather than failing.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for a well-formed opening or closing tag
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)[^<>]*>").expect("Invalid tag regex")
});

/// Tag names treated as italic markers
const ITALIC_TAGS: &[&str] = &["i", "em"];

/// One run of text with its italic state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    /// Text content with tags removed
    pub text: String,
    /// Whether the run sits inside a properly closed italic region
    pub italic: bool,
}

/// Byte intervals of content inside properly closed italic tags
fn closed_italic_intervals(input: &str) -> Vec<(usize, usize)> {
    let mut intervals = Vec::new();
    let mut open_stack: Vec<usize> = Vec::new();

    for cap in TAG_REGEX.captures_iter(input) {
        let whole = cap.get(0).expect("capture 0 always present");
        let closing = !cap[1].is_empty();
        let name = cap[2].to_lowercase();

        if !ITALIC_TAGS.contains(&name.as_str()) {
            continue;
        }

        if closing {
            // A stray </i> with no open tag is ignored
            if let Some(start) = open_stack.pop() {
                intervals.push((start, whole.start()));
            }
        } else {
            open_stack.push(whole.end());
        }
    }

    // Anything left on the stack was never closed and marks nothing
    intervals
}

/// Scan text into (text, is-italic) spans
pub fn scan_spans(input: &str) -> Vec<MarkupSpan> {
    let intervals = closed_italic_intervals(input);
    let mut spans = Vec::new();
    let mut last_end = 0;

    let mut push_segment = |start: usize, end: usize, spans: &mut Vec<MarkupSpan>| {
        if start >= end {
            return;
        }
        let italic = intervals
            .iter()
            .any(|&(a, b)| start >= a && end <= b);
        spans.push(MarkupSpan {
            text: input[start..end].to_string(),
            italic,
        });
    };

    for m in TAG_REGEX.find_iter(input) {
        push_segment(last_end, m.start(), &mut spans);
        last_end = m.end();
    }
    push_segment(last_end, input.len(), &mut spans);

    spans
}

/// Text with all well-formed tags removed
pub fn strip_markup(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }
    scan_spans(input)
        .into_iter()
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join("")
}

/// Content of each properly closed italic region, markup-stripped and trimmed
pub fn italic_regions(input: &str) -> Vec<String> {
    if !input.contains('<') {
        return Vec::new();
    }
    closed_italic_intervals(input)
        .into_iter()
        .map(|(a, b)| strip_markup(&input[a..b]).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
