//! Format engine
//!
//! A static table maps every (syntax mode, format key) pair to a wrap
//! template. Applying a template splices `prefix + text + suffix` over the
//! selection and leaves the caret right after the wrapped text, before the
//! suffix, so typing continues inside the formatting.

use crate::editor::buffer::TextBuffer;
use crate::editor::Edit;
use crate::i18n::{Locale, Text};
use crate::state::SyntaxMode;
use crate::utils::text::char_len;

/// Toolbar formatting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKey {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    InlineCode,
    CodeBlock,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Quote,
    BulletList,
    NumberedList,
    TaskList,
    HorizontalRule,
}

impl FormatKey {
    pub const ALL: [FormatKey; 17] = [
        FormatKey::Bold,
        FormatKey::Italic,
        FormatKey::Underline,
        FormatKey::Strikethrough,
        FormatKey::InlineCode,
        FormatKey::CodeBlock,
        FormatKey::Heading1,
        FormatKey::Heading2,
        FormatKey::Heading3,
        FormatKey::Heading4,
        FormatKey::Heading5,
        FormatKey::Heading6,
        FormatKey::Quote,
        FormatKey::BulletList,
        FormatKey::NumberedList,
        FormatKey::TaskList,
        FormatKey::HorizontalRule,
    ];

    /// Heading key for levels 1 to 6
    pub fn heading(level: u8) -> Option<FormatKey> {
        match level {
            1 => Some(FormatKey::Heading1),
            2 => Some(FormatKey::Heading2),
            3 => Some(FormatKey::Heading3),
            4 => Some(FormatKey::Heading4),
            5 => Some(FormatKey::Heading5),
            6 => Some(FormatKey::Heading6),
            _ => None,
        }
    }

    /// Placeholder inserted when the selection is empty
    fn placeholder(self) -> Option<Text> {
        match self {
            FormatKey::Bold => Some(Text::Bold),
            FormatKey::Italic => Some(Text::Italic),
            FormatKey::Underline => Some(Text::Underline),
            FormatKey::Strikethrough => Some(Text::Strikethrough),
            FormatKey::InlineCode | FormatKey::CodeBlock => Some(Text::Code),
            FormatKey::Heading1
            | FormatKey::Heading2
            | FormatKey::Heading3
            | FormatKey::Heading4
            | FormatKey::Heading5
            | FormatKey::Heading6 => Some(Text::Heading),
            FormatKey::Quote => Some(Text::Quote),
            FormatKey::BulletList | FormatKey::NumberedList => Some(Text::ListItem),
            FormatKey::TaskList => Some(Text::Task),
            FormatKey::HorizontalRule => None,
        }
    }
}

/// How a format wraps its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTemplate {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub default_text: &'static str,
    /// Anchored to line starts (headings, lists, quotes) rather than inline
    pub block_level: bool,
}

const fn inline(prefix: &'static str, suffix: &'static str) -> (&'static str, &'static str, bool) {
    (prefix, suffix, false)
}

const fn block(prefix: &'static str, suffix: &'static str) -> (&'static str, &'static str, bool) {
    (prefix, suffix, true)
}

impl FormatTemplate {
    /// Resolve the template for a key in the given mode
    pub fn lookup(mode: SyntaxMode, key: FormatKey, locale: Locale) -> Self {
        let (prefix, suffix, block_level) = match mode {
            SyntaxMode::Markdown => match key {
                FormatKey::Bold => inline("**", "**"),
                FormatKey::Italic => inline("*", "*"),
                FormatKey::Underline => inline("<u>", "</u>"),
                FormatKey::Strikethrough => inline("~~", "~~"),
                FormatKey::InlineCode => inline("`", "`"),
                FormatKey::CodeBlock => block("```\n", "\n```"),
                FormatKey::Heading1 => block("# ", ""),
                FormatKey::Heading2 => block("## ", ""),
                FormatKey::Heading3 => block("### ", ""),
                FormatKey::Heading4 => block("#### ", ""),
                FormatKey::Heading5 => block("##### ", ""),
                FormatKey::Heading6 => block("###### ", ""),
                FormatKey::Quote => block("> ", ""),
                FormatKey::BulletList => block("- ", ""),
                FormatKey::NumberedList => block("1. ", ""),
                FormatKey::TaskList => block("- [ ] ", ""),
                FormatKey::HorizontalRule => inline("\n---\n", ""),
            },
            SyntaxMode::Html => match key {
                FormatKey::Bold => inline("<strong>", "</strong>"),
                FormatKey::Italic => inline("<em>", "</em>"),
                FormatKey::Underline => inline("<u>", "</u>"),
                FormatKey::Strikethrough => inline("<del>", "</del>"),
                FormatKey::InlineCode => inline("<code>", "</code>"),
                FormatKey::CodeBlock => block("<pre><code>", "</code></pre>"),
                FormatKey::Heading1 => block("<h1>", "</h1>"),
                FormatKey::Heading2 => block("<h2>", "</h2>"),
                FormatKey::Heading3 => block("<h3>", "</h3>"),
                FormatKey::Heading4 => block("<h4>", "</h4>"),
                FormatKey::Heading5 => block("<h5>", "</h5>"),
                FormatKey::Heading6 => block("<h6>", "</h6>"),
                FormatKey::Quote => block("<blockquote>", "</blockquote>"),
                FormatKey::BulletList => block("<ul>\n  <li>", "</li>\n</ul>"),
                FormatKey::NumberedList => block("<ol>\n  <li>", "</li>\n</ol>"),
                FormatKey::TaskList => block(
                    "<ul>\n  <li><input type=\"checkbox\" disabled> ",
                    "</li>\n</ul>",
                ),
                FormatKey::HorizontalRule => inline("\n<hr>\n", ""),
            },
        };

        Self {
            prefix,
            suffix,
            default_text: key.placeholder().map(|t| locale.text(t)).unwrap_or(""),
            block_level,
        }
    }
}

/// Wrap the selection (or the template's default text when it is empty)
///
/// The caret lands at `start + prefix.len + wrapped.len`, in characters.
pub fn apply_format(
    buffer: &TextBuffer,
    sel_start: usize,
    sel_end: usize,
    template: &FormatTemplate,
) -> Edit {
    let start = buffer.clamp(sel_start.min(sel_end));
    let end = buffer.clamp(sel_start.max(sel_end));

    let selected = buffer.slice(start..end);
    let wrapped = if selected.is_empty() {
        template.default_text.to_string()
    } else {
        selected
    };

    let replacement = format!("{}{}{}", template.prefix, wrapped, template.suffix);
    let cursor = start + char_len(template.prefix) + char_len(&wrapped);

    Edit::caret(buffer.spliced(start..end, &replacement), cursor)
}

/// Apply a line-anchored template to every line touched by the selection
///
/// A single line is wrapped as a whole. Several lines get the prefix on each
/// line when the template has no suffix (numbered lists count up), otherwise
/// the whole block is wrapped once.
pub fn apply_block_format(
    buffer: &TextBuffer,
    sel_start: usize,
    sel_end: usize,
    key: FormatKey,
    template: &FormatTemplate,
) -> Edit {
    let start = buffer.line_start(sel_start.min(sel_end));
    let end = buffer.line_end(sel_start.max(sel_end));
    let block = buffer.slice(start..end);

    if !block.contains('\n') || !template.suffix.is_empty() {
        return apply_format(buffer, start, end, template);
    }

    let numbered = key == FormatKey::NumberedList && template.suffix.is_empty();
    let lines: Vec<String> = block
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if numbered {
                format!("{}. {}", i + 1, line)
            } else {
                format!("{}{}", template.prefix, line)
            }
        })
        .collect();
    let replacement = lines.join("\n");
    let cursor = start + char_len(&replacement);

    Edit::caret(buffer.spliced(start..end, &replacement), cursor)
}
