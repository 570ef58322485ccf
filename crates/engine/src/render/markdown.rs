//! Summary markup to HTML rendering
//!
//! Entry summaries may embed lightweight inline markup: code spans for
//! cross-references (`CallBuilder::returns`), emphasis, links. Summaries are
//! one-liners, so the block structure markdown produces is flattened to a
//! single inline fragment.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// Render an entry summary to an inline HTML fragment.
pub fn summary_to_html(summary: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(summary, options);
    let parser = ParagraphFlattener::new(parser);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output.trim().to_string()
}

/// Iterator adapter that drops paragraph tags, keeping their inline content.
/// A paragraph boundary becomes a single space so multi-sentence summaries
/// stay readable.
struct ParagraphFlattener<I> {
    inner: I,
    emitted_any: bool,
}

impl<I> ParagraphFlattener<I> {
    fn new(inner: I) -> Self {
        Self {
            inner,
            emitted_any: false,
        }
    }
}

impl<'a, I> Iterator for ParagraphFlattener<I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.inner.next()?;
            match &event {
                Event::Start(Tag::Paragraph) => {
                    if self.emitted_any {
                        return Some(Event::Text(" ".into()));
                    }
                    continue;
                }
                Event::End(TagEnd::Paragraph) => continue,
                _ => {
                    self.emitted_any = true;
                    return Some(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_summary_passes_through() {
        let html = summary_to_html("Builds up a cross contract call.");
        assert_eq!(html, "Builds up a cross contract call.");
    }

    #[test]
    fn code_spans_become_code_tags() {
        let html = summary_to_html("Types usable in `CallBuilder::returns`.");
        assert!(html.contains("<code>CallBuilder::returns</code>"));
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn html_in_summary_is_escaped() {
        let html = summary_to_html("compares with a < b");
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn links_are_preserved() {
        let html = summary_to_html("See [CallParams](lib/struct.CallParams.html).");
        assert!(html.contains("<a href=\"lib/struct.CallParams.html\">CallParams</a>"));
    }

    #[test]
    fn paragraph_breaks_flatten_to_one_line() {
        let html = summary_to_html("First sentence.\n\nSecond sentence.");
        assert_eq!(html, "First sentence. Second sentence.");
    }

    #[test]
    fn empty_summary_renders_empty() {
        assert_eq!(summary_to_html(""), "");
    }
}
