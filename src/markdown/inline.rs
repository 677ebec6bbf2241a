//! Inline Markdown spans
//!
//! Rules run in a fixed order over one block of text:
//! code spans are cut out first so nothing inside them is touched, then
//! images and links, whose targets are parked the same way, and finally
//! `***x***`, `**x**`, `*x*` and `~~x~~`. Raw HTML in the text passes through,
//! since the Markdown toolbar itself inserts tags such as `<u>`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::text::escape_html;

// Rendered fragments are parked behind private-use markers while the other
// rules run
const PARK_OPEN: char = '\u{E000}';
const PARK_CLOSE: char = '\u{E001}';

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code span pattern"));
static PARKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("parked span pattern"));
static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(\S(?:.*?\S)?)\*\*\*").expect("bold italic pattern"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").expect("bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").expect("italic pattern"));
static STRIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(\S(?:.*?\S)?)~~").expect("strikethrough pattern"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("image pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("link pattern"));

fn park(parked: &mut Vec<String>, html: String) -> String {
    parked.push(html);
    format!("{}{}{}", PARK_OPEN, parked.len() - 1, PARK_CLOSE)
}

/// Put code spans cut out of an attribute value back as their source text
fn unpark_source(value: &str, sources: &[String]) -> String {
    PARKED
        .replace_all(value, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| sources.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

/// Render the inline spans of one block of text
pub fn render_inline(text: &str) -> String {
    let mut parked = Vec::new();
    let mut sources = Vec::new();
    let out = CODE_SPAN.replace_all(text, |caps: &Captures| {
        sources.push(caps[0].to_string());
        park(&mut parked, format!("<code>{}</code>", escape_html(&caps[1])))
    });

    // Images first: the link rule would otherwise take `[alt](src)` and
    // leave a stray `!`
    let out = IMAGE.replace_all(&out, |caps: &Captures| {
        let html = format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(&unpark_source(&caps[2], &sources)),
            escape_html(&unpark_source(&caps[1], &sources))
        );
        park(&mut parked, html)
    });
    // Link text stays in the flow so emphasis still applies to it
    let out = LINK.replace_all(&out, |caps: &Captures| {
        let open = format!(
            "<a href=\"{}\">",
            escape_html(&unpark_source(&caps[2], &sources))
        );
        format!("{}{}</a>", park(&mut parked, open), &caps[1])
    });

    let out = BOLD_ITALIC.replace_all(&out, "<strong><em>${1}</em></strong>");
    let out = BOLD.replace_all(&out, "<strong>${1}</strong>");
    let out = ITALIC.replace_all(&out, "<em>${1}</em>");
    let out = STRIKE.replace_all(&out, "<del>${1}</del>");

    if parked.is_empty() {
        return out.into_owned();
    }
    PARKED
        .replace_all(&out, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| parked.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_order() {
        assert_eq!(render_inline("***x***"), "<strong><em>x</em></strong>");
        assert_eq!(render_inline("**b** and *i*"), "<strong>b</strong> and <em>i</em>");
        assert_eq!(render_inline("~~gone~~"), "<del>gone</del>");
    }

    #[test]
    fn test_lone_asterisks_stay_literal() {
        assert_eq!(render_inline("2 * 3 * 4"), "2 * 3 * 4");
        assert_eq!(render_inline("**unclosed"), "**unclosed");
    }

    #[test]
    fn test_code_span_is_protected_and_escaped() {
        assert_eq!(
            render_inline("use `**not bold** <b>` here"),
            "use <code>**not bold** &lt;b&gt;</code> here"
        );
        assert_eq!(render_inline("`a` and `b`"), "<code>a</code> and <code>b</code>");
    }

    #[test]
    fn test_adjacent_image_and_link() {
        assert_eq!(
            render_inline("![pic](/a.png)[site](http://x)"),
            "<img src=\"/a.png\" alt=\"pic\"><a href=\"http://x\">site</a>"
        );
        assert_eq!(
            render_inline("[site](http://x) ![pic](/a.png)"),
            "<a href=\"http://x\">site</a> <img src=\"/a.png\" alt=\"pic\">"
        );
    }

    #[test]
    fn test_link_attribute_is_escaped() {
        assert_eq!(
            render_inline("[x](a\"b)"),
            "<a href=\"a&quot;b\">x</a>"
        );
    }

    #[test]
    fn test_link_targets_keep_their_characters() {
        assert_eq!(
            render_inline("[docs](https://x.org/a*b*c)"),
            "<a href=\"https://x.org/a*b*c\">docs</a>"
        );
        assert_eq!(render_inline("[a](`u`)"), "<a href=\"`u`\">a</a>");
        assert_eq!(
            render_inline("![*pic*](/a_~~b~~.png)"),
            "<img src=\"/a_~~b~~.png\" alt=\"*pic*\">"
        );
    }

    #[test]
    fn test_emphasis_inside_link_text() {
        assert_eq!(
            render_inline("see [**this** `x`](u)"),
            "see <a href=\"u\"><strong>this</strong> <code>x</code></a>"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert_eq!(render_inline("<u>under</u>"), "<u>under</u>");
    }
}
