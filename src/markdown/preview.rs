//! Markdown preview rendering
//!
//! A line scanner groups the document into blocks, then inline spans are
//! rendered per block. Block precedence, first match wins:
//!
//! 1. fenced code (an unterminated fence is ordinary text)
//! 2. ATX headings, `#` to `######` followed by a space
//! 3. thematic breaks (`---`, `***`, `___`)
//! 4. blockquotes, consecutive `>` lines merged into one quote
//! 5. pipe tables (header row plus separator row)
//! 6. task items, then bullet items, then ordered items
//! 7. paragraphs, separated by blank lines
//!
//! Paragraphs are only ever built from plain lines, so block elements are
//! never wrapped in `<p>` and no empty paragraph is produced. Rendering is
//! total: any input yields some HTML.

use crate::editor::structure::Alignment;
use crate::markdown::inline::render_inline;
use crate::state::SyntaxMode;
use crate::utils::text::escape_html;

/// Preview HTML for the buffer; HTML mode is shown as written
pub fn render_preview(mode: SyntaxMode, text: &str) -> String {
    match mode {
        SyntaxMode::Markdown => markdown_to_html(text),
        SyntaxMode::Html => text.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListItem<'a> {
    Task { checked: bool, text: &'a str },
    Bullet(&'a str),
    Ordered { number: u64, text: &'a str },
}

impl ListItem<'_> {
    fn kind(&self) -> ListKind {
        match self {
            ListItem::Task { .. } | ListItem::Bullet(_) => ListKind::Unordered,
            ListItem::Ordered { .. } => ListKind::Ordered,
        }
    }

    fn to_html(&self) -> String {
        match self {
            ListItem::Task { checked, text } => format!(
                "<li class=\"task-list-item\"><input type=\"checkbox\"{} disabled> {}</li>",
                if *checked { " checked" } else { "" },
                render_inline(text)
            ),
            ListItem::Bullet(text) | ListItem::Ordered { text, .. } => {
                format!("<li>{}</li>", render_inline(text))
            }
        }
    }
}

/// Render a Markdown document to HTML
pub fn markdown_to_html(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            i += 1;
            continue;
        }

        if let Some(lang) = fence_open(line) {
            if let Some(close) = (i + 1..lines.len()).find(|&j| is_fence_close(lines[j])) {
                flush_paragraph(&mut paragraph, &mut blocks);
                blocks.push(code_block(lang, &lines[i + 1..close]));
                i = close + 1;
                continue;
            }
        }

        if let Some((level, content)) = heading(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(format!("<h{level}>{}</h{level}>", render_inline(content)));
            i += 1;
            continue;
        }

        if is_rule(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push("<hr>".to_string());
            i += 1;
            continue;
        }

        if quote_content(line).is_some() {
            flush_paragraph(&mut paragraph, &mut blocks);
            let mut quoted = Vec::new();
            while let Some(content) = lines.get(i).and_then(|l| quote_content(l)) {
                quoted.push(render_inline(content));
                i += 1;
            }
            blocks.push(format!("<blockquote>{}</blockquote>", quoted.join("<br>\n")));
            continue;
        }

        if let Some(alignments) = lines.get(i + 1).and_then(|next| table_separator(line, next)) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let mut rows = Vec::new();
            let mut j = i + 2;
            while j < lines.len() && is_table_row(lines[j]) {
                rows.push(lines[j]);
                j += 1;
            }
            blocks.push(table(line, &alignments, &rows));
            i = j;
            continue;
        }

        if let Some(first) = list_item(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let kind = first.kind();
            let mut items = vec![first];
            i += 1;
            while let Some(item) = lines.get(i).and_then(|l| list_item(l)) {
                if item.kind() != kind {
                    break;
                }
                items.push(item);
                i += 1;
            }
            blocks.push(list(kind, &items));
            continue;
        }

        paragraph.push(line);
        i += 1;
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks.join("\n")
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    let text: Vec<&str> = paragraph.drain(..).map(str::trim).collect();
    blocks.push(format!("<p>{}</p>", render_inline(&text.join("\n"))));
}

/// Info string of an opening fence
fn fence_open(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix("```").map(str::trim)
}

fn is_fence_close(line: &str) -> bool {
    line.trim()
        .strip_prefix("```")
        .is_some_and(|rest| rest.trim_start_matches('`').is_empty())
}

fn code_block(info: &str, body: &[&str]) -> String {
    let code = escape_html(body.join("\n").trim());
    match info.split_whitespace().next() {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(lang),
            code
        ),
        None => format!("<pre><code>{}</code></pre>", code),
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ')
        .or_else(|| rest.strip_prefix('\t'))
        .map(|content| (level, content.trim()))
}

fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    matches!(marker, '-' | '*' | '_')
        && trimmed.chars().count() >= 3
        && trimmed.chars().all(|c| c == marker)
}

fn quote_content(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest).trim_end())
}

fn list_item(line: &str) -> Option<ListItem<'_>> {
    let trimmed = line.trim_start();

    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            let task = rest
                .strip_prefix("[ ]")
                .map(|t| (false, t))
                .or_else(|| rest.strip_prefix("[x]").map(|t| (true, t)))
                .or_else(|| rest.strip_prefix("[X]").map(|t| (true, t)));
            if let Some((checked, text)) = task {
                if text.is_empty() || text.starts_with(' ') {
                    return Some(ListItem::Task {
                        checked,
                        text: text.trim(),
                    });
                }
            }
            return Some(ListItem::Bullet(rest.trim()));
        }
    }

    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let text = trimmed[digits..].strip_prefix(". ")?;
    let number = trimmed[..digits].parse().ok()?;
    Some(ListItem::Ordered {
        number,
        text: text.trim(),
    })
}

fn list(kind: ListKind, items: &[ListItem<'_>]) -> String {
    let open = match (kind, items.first()) {
        (ListKind::Ordered, Some(ListItem::Ordered { number, .. })) if *number != 1 => {
            format!("<ol start=\"{}\">", number)
        }
        (ListKind::Ordered, _) => "<ol>".to_string(),
        (ListKind::Unordered, _) => "<ul>".to_string(),
    };
    let close = match kind {
        ListKind::Ordered => "</ol>",
        ListKind::Unordered => "</ul>",
    };

    let mut html = vec![open];
    html.extend(items.iter().map(ListItem::to_html));
    html.push(close.to_string());
    html.join("\n")
}

fn is_table_row(line: &str) -> bool {
    !line.trim().is_empty() && line.contains('|')
}

fn table_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(str::trim).collect()
}

/// Column alignments when `header` and `separator` open a pipe table
fn table_separator(header: &str, separator: &str) -> Option<Vec<Alignment>> {
    if !is_table_row(header) || !separator.contains('-') || !is_table_row(separator) {
        return None;
    }
    let columns = table_cells(header).len();
    let cells = table_cells(separator);
    if cells.len() != columns {
        return None;
    }

    cells
        .iter()
        .map(|cell| {
            let left = cell.starts_with(':');
            let right = cell.ends_with(':') && cell.len() > 1;
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Alignment::Center,
                (false, true) => Alignment::Right,
                _ => Alignment::Left,
            })
        })
        .collect()
}

fn table(header: &str, alignments: &[Alignment], rows: &[&str]) -> String {
    let row_html = |line: &str, tag: &str| {
        let cells = table_cells(line);
        let mut html = vec!["<tr>".to_string()];
        for (col, alignment) in alignments.iter().enumerate() {
            let cell = cells.get(col).copied().unwrap_or("");
            html.push(format!(
                "<{tag}{}>{}</{tag}>",
                alignment.style_attr(),
                render_inline(cell)
            ));
        }
        html.push("</tr>".to_string());
        html.join("\n")
    };

    let mut html = vec![
        "<table>".to_string(),
        "<thead>".to_string(),
        row_html(header, "th"),
        "</thead>".to_string(),
    ];
    if !rows.is_empty() {
        html.push("<tbody>".to_string());
        html.extend(rows.iter().map(|&row| row_html(row, "td")));
        html.push("</tbody>".to_string());
    }
    html.push("</table>".to_string());
    html.join("\n")
}
