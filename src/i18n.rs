//! Localized placeholder strings
//!
//! The toolbar inserts placeholder text whenever a command runs on an empty
//! selection. The admin panel is Japanese first, English second.

use serde::{Deserialize, Serialize};

/// Language of inserted placeholder text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    Ja,
    En,
}

/// Identifiers for every placeholder string the editor inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    Placeholder,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Heading,
    Quote,
    ListItem,
    Task,
    LinkLabel,
    TableHeader,
    TableCell,
}

impl Locale {
    /// Look up a placeholder string
    pub fn text(self, id: Text) -> &'static str {
        match self {
            Locale::Ja => match id {
                Text::Placeholder => "テキスト",
                Text::Bold => "太字",
                Text::Italic => "斜体",
                Text::Underline => "下線",
                Text::Strikethrough => "取り消し線",
                Text::Code => "コード",
                Text::Heading => "見出し",
                Text::Quote => "引用",
                Text::ListItem => "リスト項目",
                Text::Task => "タスク",
                Text::LinkLabel => "リンク",
                Text::TableHeader => "見出し",
                Text::TableCell => "セル",
            },
            Locale::En => match id {
                Text::Placeholder => "text",
                Text::Bold => "bold text",
                Text::Italic => "italic text",
                Text::Underline => "underlined text",
                Text::Strikethrough => "strikethrough",
                Text::Code => "code",
                Text::Heading => "Heading",
                Text::Quote => "quote",
                Text::ListItem => "list item",
                Text::Task => "task",
                Text::LinkLabel => "link",
                Text::TableHeader => "Header",
                Text::TableCell => "Cell",
            },
        }
    }

    /// Placeholder with a running number, e.g. table headers
    pub fn numbered(self, id: Text, n: usize) -> String {
        match self {
            Locale::Ja => format!("{}{}", self.text(id), n),
            Locale::En => format!("{} {}", self.text(id), n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_per_locale() {
        assert_eq!(Locale::Ja.text(Text::Placeholder), "テキスト");
        assert_eq!(Locale::En.text(Text::Placeholder), "text");
        assert_eq!(Locale::default(), Locale::Ja);
    }

    #[test]
    fn test_numbered() {
        assert_eq!(Locale::Ja.numbered(Text::TableHeader, 2), "見出し2");
        assert_eq!(Locale::En.numbered(Text::TableHeader, 2), "Header 2");
    }
}
