//! Named block properties and the shallow merge used by `updateBlock`.
//!
//! An update carries a list of [`Property`] values. Each one overwrites
//! exactly the attribute it names; everything else on the block is left as
//! it was. Properties that do not apply to the block's type are ignored.

use crate::models::block::{Align, Block, BlockProps, Column, ColumnKind, ListStyle};

/// One settable block property together with its new value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    // Shared by every block type
    Align(Option<Align>),
    FontSize(Option<u32>),
    Color(Option<String>),
    BackgroundColor(Option<String>),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    IndentAll(bool),

    // Paragraph, heading, list
    Indent(bool),
    // Paragraph, heading
    DropCap(bool),
    // Paragraph
    Link(Option<String>),
    // Heading
    Level(u8),
    // List
    Ordered(bool),
    ListStyle(ListStyle),
    // Code
    Language(String),
    // Image, video
    Url(String),
    // Image
    Alt(String),
    // Video
    Title(Option<String>),
    // Spacer
    Spacing(u32),
    // Table
    TableRows(usize),
    TableCols(usize),
    TableData(Vec<Vec<String>>),
    // Columns
    ColumnCount(usize),
    ColumnGap(u32),
    ColumnTypes(Vec<ColumnKind>),
    ColumnContents(Vec<String>),
}

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Property::Align(_) => "align",
            Property::FontSize(_) => "fontSize",
            Property::Color(_) => "color",
            Property::BackgroundColor(_) => "backgroundColor",
            Property::Bold(_) => "bold",
            Property::Italic(_) => "italic",
            Property::Underline(_) => "underline",
            Property::IndentAll(_) => "indentAll",
            Property::Indent(_) => "indent",
            Property::DropCap(_) => "dropCap",
            Property::Link(_) => "link",
            Property::Level(_) => "level",
            Property::Ordered(_) => "ordered",
            Property::ListStyle(_) => "listStyle",
            Property::Language(_) => "language",
            Property::Url(_) => "url",
            Property::Alt(_) => "alt",
            Property::Title(_) => "title",
            Property::Spacing(_) => "spacing",
            Property::TableRows(_) => "tableRows",
            Property::TableCols(_) => "tableCols",
            Property::TableData(_) => "tableData",
            Property::ColumnCount(_) => "columnCount",
            Property::ColumnGap(_) => "columnGap",
            Property::ColumnTypes(_) => "columnTypes",
            Property::ColumnContents(_) => "columnContents",
        }
    }
}

impl Block {
    /// Merge `properties` into this block key by key, last write wins.
    ///
    /// Returns how many properties applied. Properties that are meaningless
    /// for this block's type are skipped.
    pub fn merge(&mut self, properties: impl IntoIterator<Item = Property>) -> usize {
        let mut applied = 0;
        for property in properties {
            let name = property.name();
            if self.merge_one(property) {
                applied += 1;
            } else {
                log::debug!(
                    "ignoring property {name} on {} block {}",
                    self.block_type(),
                    self.id
                );
            }
        }
        applied
    }

    fn merge_one(&mut self, property: Property) -> bool {
        let style = &mut self.style;
        match (property, &mut self.props) {
            (Property::Align(value), _) => style.align = value,
            (Property::FontSize(value), _) => style.font_size = value,
            (Property::Color(value), _) => style.color = value,
            (Property::BackgroundColor(value), _) => style.background_color = value,
            (Property::Bold(value), _) => style.bold = value,
            (Property::Italic(value), _) => style.italic = value,
            (Property::Underline(value), _) => style.underline = value,
            (Property::IndentAll(value), _) => style.indent_all = value,

            (
                Property::Indent(value),
                BlockProps::Paragraph { indent, .. }
                | BlockProps::Heading { indent, .. }
                | BlockProps::List { indent, .. },
            ) => *indent = value,
            (
                Property::DropCap(value),
                BlockProps::Paragraph { drop_cap, .. } | BlockProps::Heading { drop_cap, .. },
            ) => *drop_cap = value,
            (Property::Link(value), BlockProps::Paragraph { link, .. }) => *link = value,
            (Property::Level(value), BlockProps::Heading { level, .. }) => {
                *level = value.clamp(1, 6)
            }
            (Property::Ordered(value), BlockProps::List { ordered, .. }) => *ordered = value,
            (Property::ListStyle(value), BlockProps::List { list_style, .. }) => {
                *list_style = value
            }
            (Property::Language(value), BlockProps::Code { language }) => *language = value,
            (
                Property::Url(value),
                BlockProps::Image { url, .. } | BlockProps::Video { url, .. },
            ) => *url = value,
            (Property::Alt(value), BlockProps::Image { alt, .. }) => *alt = value,
            (Property::Title(value), BlockProps::Video { title, .. }) => *title = value,
            (Property::Spacing(value), BlockProps::Spacer { height }) => *height = value,

            (Property::TableRows(value), BlockProps::Table { rows, cols, data }) => {
                *rows = value;
                data.resize(value, vec![String::new(); *cols]);
            }
            (Property::TableCols(value), BlockProps::Table { cols, data, .. }) => {
                *cols = value;
                for row in data.iter_mut() {
                    row.resize(value, String::new());
                }
            }
            (Property::TableData(value), BlockProps::Table { rows, cols, data }) => {
                *rows = value.len();
                if let Some(widest) = value.iter().map(Vec::len).max().filter(|w| *w > 0) {
                    *cols = widest;
                }
                *data = value;
            }

            (Property::ColumnCount(value), BlockProps::Columns { count, columns, .. }) => {
                *count = value.max(1);
                grow_columns(columns, *count);
            }
            (Property::ColumnGap(value), BlockProps::Columns { gap, .. }) => *gap = value,
            (Property::ColumnTypes(kinds), BlockProps::Columns { columns, .. }) => {
                grow_columns(columns, kinds.len());
                for (column, kind) in columns.iter_mut().zip(kinds) {
                    column.kind = kind;
                }
            }
            (Property::ColumnContents(contents), BlockProps::Columns { columns, .. }) => {
                grow_columns(columns, contents.len());
                for (column, content) in columns.iter_mut().zip(contents) {
                    column.content = content;
                }
            }

            _ => return false,
        }
        true
    }
}

fn grow_columns(columns: &mut Vec<Column>, len: usize) {
    if columns.len() < len {
        columns.resize(len, Column::default());
    }
}
