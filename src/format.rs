use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"(?m)^## (.+)$").unwrap();
    static ref STRONG_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
}

/// Renders model output (with its lightweight `##` / `**` / `* ` conventions)
/// into a display-ready HTML fragment.
///
/// Pure and deterministic; performs no well-formedness validation. One
/// closing `</ul>` is always emitted at the end of the fragment, even when
/// the input contains no list items — consumers should not rely on that
/// stray tag.
pub fn format_text(text: &str) -> String {
    // Line-level headings first, then inline strong spans over the whole
    // text, so a heading can still carry emphasis inside it.
    let text = HEADING_RE.replace_all(text, "<h2>$1</h2>");
    let text = STRONG_RE.replace_all(&text, "<strong>$1</strong>");

    let mut body = String::new();
    let mut in_list = false;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(item) = line.strip_prefix("* ") {
            if !in_list {
                body.push_str("<ul>");
                in_list = true;
            }
            body.push_str("<li>");
            body.push_str(item.trim());
            body.push_str("</li>");
        } else {
            if in_list {
                body.push_str("</ul>");
                in_list = false;
            }
            if line.starts_with("<h2>") {
                // Headings stand on their own, not inside a paragraph.
                body.push_str(line);
            } else {
                body.push_str("<p>");
                body.push_str(line);
                body.push_str("</p>");
            }
        }
    }
    // Unconditional trailing close: pairs a still-open run, and is the
    // stray tag documented above otherwise.
    body.push_str("</ul>");

    format!("<div style=\"padding: 10px; line-height: 1.6;\">{body}</div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_becomes_a_single_paragraph() {
        let out = format_text("just a sentence");
        assert_eq!(
            out,
            "<div style=\"padding: 10px; line-height: 1.6;\"><p>just a sentence</p></ul></div>"
        );
    }

    #[test]
    fn heading_list_and_paragraph_keep_their_order() {
        let out = format_text("## Title\n* item1\n* item2\nplain line");
        assert_eq!(
            out,
            "<div style=\"padding: 10px; line-height: 1.6;\">\
             <h2>Title</h2><ul><li>item1</li><li>item2</li></ul><p>plain line</p></ul></div>"
        );
    }

    #[test]
    fn strong_span_wraps_exactly_the_enclosed_text() {
        let out = format_text("before **bold** after");
        assert!(out.contains("<p>before <strong>bold</strong> after</p>"));
    }

    #[test]
    fn strong_matching_is_non_greedy() {
        let out = format_text("**a** and **b**");
        assert!(out.contains("<strong>a</strong> and <strong>b</strong>"));
    }

    #[test]
    fn heading_may_contain_a_strong_span() {
        let out = format_text("## The **big** picture");
        assert!(out.contains("<h2>The <strong>big</strong> picture</h2>"));
    }

    #[test]
    fn blank_lines_are_discarded() {
        let out = format_text("one\n\n   \ntwo");
        assert!(out.contains("<p>one</p><p>two</p>"));
        assert!(!out.contains("<p></p>"));
    }

    #[test]
    fn list_items_tolerate_surrounding_whitespace() {
        let out = format_text("  * padded item  ");
        assert!(out.contains("<ul><li>padded item</li></ul>"));
    }

    #[test]
    fn trailing_list_is_closed_once_at_end_of_input() {
        let out = format_text("* only\n* items");
        assert_eq!(
            out,
            "<div style=\"padding: 10px; line-height: 1.6;\">\
             <ul><li>only</li><li>items</li></ul></div>"
        );
    }

    #[test]
    fn separate_runs_get_separate_containers() {
        let out = format_text("* a\nbreak\n* b");
        assert!(out.contains("<ul><li>a</li></ul><p>break</p><ul><li>b</li></ul>"));
    }

    #[test]
    fn input_without_list_items_still_ends_with_a_close() {
        let out = format_text("no lists here");
        assert!(out.ends_with("</ul></div>"));
    }

    #[test]
    fn indented_heading_marker_is_not_a_heading() {
        let out = format_text("  ## not a heading");
        assert!(out.contains("<p>## not a heading</p>"));
    }

    #[test]
    fn empty_input_yields_only_the_wrapper_and_stray_close() {
        assert_eq!(
            format_text(""),
            "<div style=\"padding: 10px; line-height: 1.6;\"></ul></div>"
        );
    }
}
