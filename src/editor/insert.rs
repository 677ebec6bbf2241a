//! Compound inserts: links, images and tables built from dialog input
//!
//! Builders are pure `(mode, dialog) -> markup` functions. The markup then
//! replaces the selection that was saved when the dialog opened.

use crate::editor::buffer::TextBuffer;
use crate::editor::structure::Alignment;
use crate::editor::Edit;
use crate::i18n::{Locale, Text};
use crate::state::{Selection, SyntaxMode};
use crate::utils::text::{char_len, escape_html};

/// Which modal dialog is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Link,
    Image,
    Table,
}

/// Input of the link dialog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkDialog {
    pub url: String,
    pub text: String,
    pub open_in_new_tab: bool,
}

impl LinkDialog {
    /// The confirm button is enabled only with a URL
    pub fn is_valid(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Input of the image dialog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageDialog {
    pub url: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageDialog {
    /// The confirm button is enabled only with a URL
    pub fn is_valid(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Input of the table dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDialog {
    pub rows: usize,
    pub cols: usize,
    pub has_header: bool,
    pub alignment: Alignment,
}

impl TableDialog {
    /// Build dialog input, clamping rows and columns to at least one
    pub fn new(rows: usize, cols: usize, has_header: bool, alignment: Alignment) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            has_header,
            alignment,
        }
    }

    /// Number of body rows; the header row counts towards `rows`
    pub fn body_rows(&self) -> usize {
        if self.has_header {
            self.rows.saturating_sub(1)
        } else {
            self.rows
        }
    }
}

impl Default for TableDialog {
    fn default() -> Self {
        Self::new(3, 3, true, Alignment::Left)
    }
}

/// Link markup
pub fn build_link(mode: SyntaxMode, dialog: &LinkDialog, locale: Locale) -> String {
    let text = if dialog.text.is_empty() {
        locale.text(Text::LinkLabel)
    } else {
        dialog.text.as_str()
    };
    let url = dialog.url.trim();

    match mode {
        SyntaxMode::Markdown => format!("[{}]({})", text, url),
        SyntaxMode::Html => {
            let target = if dialog.open_in_new_tab {
                " target=\"_blank\" rel=\"noopener noreferrer\""
            } else {
                ""
            };
            format!("<a href=\"{}\"{}>{}</a>", escape_html(url), target, text)
        }
    }
}

/// Image markup; size attributes are only emitted when given
pub fn build_image(mode: SyntaxMode, dialog: &ImageDialog) -> String {
    let url = dialog.url.trim();
    match mode {
        SyntaxMode::Markdown => format!("![{}]({})", dialog.alt, url),
        SyntaxMode::Html => {
            let mut markup = format!(
                "<img src=\"{}\" alt=\"{}\"",
                escape_html(url),
                escape_html(&dialog.alt)
            );
            if let Some(width) = dialog.width {
                markup.push_str(&format!(" width=\"{}\"", width));
            }
            if let Some(height) = dialog.height {
                markup.push_str(&format!(" height=\"{}\"", height));
            }
            markup.push('>');
            markup
        }
    }
}

/// Table skeleton with placeholder cells
pub fn build_table(mode: SyntaxMode, dialog: &TableDialog, locale: Locale) -> String {
    let cols = dialog.cols.max(1);
    let body_rows = dialog.body_rows();
    let headers: Vec<String> = (1..=cols)
        .map(|i| locale.numbered(Text::TableHeader, i))
        .collect();
    let cell = locale.text(Text::TableCell);

    match mode {
        SyntaxMode::Markdown => {
            let mut lines = Vec::with_capacity(body_rows + 2);
            if dialog.has_header {
                let cells: Vec<&str> = headers.iter().map(String::as_str).collect();
                lines.push(pipe_row(&cells));
            } else {
                // Pipe tables always need a header line
                lines.push(pipe_row(&vec![""; cols]));
            }
            lines.push(pipe_row(&vec![dialog.alignment.separator(); cols]));
            for _ in 0..body_rows {
                lines.push(pipe_row(&vec![cell; cols]));
            }
            lines.join("\n")
        }
        SyntaxMode::Html => {
            let style = dialog.alignment.style_attr();
            let mut html = String::from("<table>\n");
            if dialog.has_header {
                html.push_str("  <thead>\n    <tr>\n");
                for header in &headers {
                    html.push_str(&format!("      <th{}>{}</th>\n", style, header));
                }
                html.push_str("    </tr>\n  </thead>\n");
            }
            html.push_str("  <tbody>\n");
            for _ in 0..body_rows {
                html.push_str("    <tr>\n");
                for _ in 0..cols {
                    html.push_str(&format!("      <td{}>{}</td>\n", style, cell));
                }
                html.push_str("    </tr>\n");
            }
            html.push_str("  </tbody>\n</table>");
            html
        }
    }
}

fn pipe_row(cells: &[&str]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Replace the saved selection with `markup`, caret after it
pub fn insert_markup(buffer: &TextBuffer, saved: &Selection, markup: &str) -> Edit {
    let start = buffer.clamp(saved.start);
    let end = buffer.clamp(saved.end).max(start);
    Edit::caret(buffer.spliced(start..end, markup), start + char_len(markup))
}

/// Insert a table on its own lines in place of the saved selection
pub fn insert_table(buffer: &TextBuffer, saved: &Selection, table: &str) -> Edit {
    insert_markup(buffer, saved, &format!("\n{}\n", table))
}
