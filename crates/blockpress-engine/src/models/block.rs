use std::fmt;

use uuid::Uuid;

/// Stable identifier of a block within an editing session
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed set of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading,
    List,
    Quote,
    Image,
    Divider,
    Spacer,
    Table,
    Columns,
    Code,
    Video,
}

impl BlockType {
    pub const ALL: [BlockType; 11] = [
        BlockType::Paragraph,
        BlockType::Heading,
        BlockType::List,
        BlockType::Quote,
        BlockType::Image,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Table,
        BlockType::Columns,
        BlockType::Code,
        BlockType::Video,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::List => "list",
            BlockType::Quote => "quote",
            BlockType::Image => "image",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Table => "table",
            BlockType::Columns => "columns",
            BlockType::Code => "code",
            BlockType::Video => "video",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }
}

/// CSS `list-style-type` values offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Disc,
    Circle,
    Square,
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl ListStyle {
    pub fn default_for(ordered: bool) -> Self {
        if ordered {
            ListStyle::Decimal
        } else {
            ListStyle::Disc
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            ListStyle::Disc => "disc",
            ListStyle::Circle => "circle",
            ListStyle::Square => "square",
            ListStyle::Decimal => "decimal",
            ListStyle::LowerAlpha => "lower-alpha",
            ListStyle::UpperAlpha => "upper-alpha",
            ListStyle::LowerRoman => "lower-roman",
            ListStyle::UpperRoman => "upper-roman",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        let style = match value.trim().to_ascii_lowercase().as_str() {
            "disc" => ListStyle::Disc,
            "circle" => ListStyle::Circle,
            "square" => ListStyle::Square,
            "decimal" => ListStyle::Decimal,
            "lower-alpha" | "lower-latin" => ListStyle::LowerAlpha,
            "upper-alpha" | "upper-latin" => ListStyle::UpperAlpha,
            "lower-roman" => ListStyle::LowerRoman,
            "upper-roman" => ListStyle::UpperRoman,
            _ => return None,
        };
        Some(style)
    }
}

/// What a single column of a columns block holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Text,
    Image,
    Code,
    Video,
}

/// One column of a columns block. `content` is text, an image URL, code, or a video URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    pub kind: ColumnKind,
    pub content: String,
}

impl Column {
    pub fn new(kind: ColumnKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// Presentation attributes shared by every block type.
///
/// Only set attributes are emitted when serializing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub align: Option<Align>,
    pub font_size: Option<u32>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub indent_all: bool,
}

pub const PARAGRAPH_FONT_SIZE: u32 = 16;
pub const CODE_BACKGROUND: &str = "#1e1e1e";
pub const CODE_FOREGROUND: &str = "#d4d4d4";
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";
pub const DEFAULT_SPACER_HEIGHT: u32 = 40;
pub const DEFAULT_COLUMN_GAP: u32 = 20;
pub const DEFAULT_TABLE_COLS: usize = 3;

/// Default font size for a heading level: 32/28/24 for h1/h2/h3 and deeper.
pub fn heading_font_size(level: u8) -> u32 {
    match level {
        0 | 1 => 32,
        2 => 28,
        _ => 24,
    }
}

/// Type-specific properties, one variant per [`BlockType`].
///
/// A block carries exactly the fields relevant to its type, so combinations
/// such as a heading level on an image cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockProps {
    Paragraph {
        link: Option<String>,
        drop_cap: bool,
        indent: bool,
    },
    Heading {
        /// 1..=6
        level: u8,
        drop_cap: bool,
        indent: bool,
    },
    List {
        ordered: bool,
        list_style: ListStyle,
        indent: bool,
    },
    Quote,
    Image {
        url: String,
        alt: String,
    },
    Divider,
    Spacer {
        /// Pixels
        height: u32,
    },
    Table {
        rows: usize,
        cols: usize,
        /// Cell text, row by row
        data: Vec<Vec<String>>,
    },
    Columns {
        count: usize,
        gap: u32,
        /// May hold more entries than `count`; only the first `count` render
        columns: Vec<Column>,
    },
    Code {
        language: String,
    },
    Video {
        url: String,
        title: Option<String>,
    },
}

impl BlockProps {
    /// Default properties for a newly inserted block of `block_type`.
    pub fn defaults(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Paragraph => BlockProps::Paragraph {
                link: None,
                drop_cap: false,
                indent: false,
            },
            BlockType::Heading => BlockProps::Heading {
                level: 2,
                drop_cap: false,
                indent: false,
            },
            BlockType::List => BlockProps::List {
                ordered: false,
                list_style: ListStyle::Disc,
                indent: false,
            },
            BlockType::Quote => BlockProps::Quote,
            BlockType::Image => BlockProps::Image {
                url: String::new(),
                alt: String::new(),
            },
            BlockType::Divider => BlockProps::Divider,
            BlockType::Spacer => BlockProps::Spacer {
                height: DEFAULT_SPACER_HEIGHT,
            },
            BlockType::Table => BlockProps::Table {
                rows: 3,
                cols: DEFAULT_TABLE_COLS,
                data: vec![vec![String::new(); DEFAULT_TABLE_COLS]; 3],
            },
            BlockType::Columns => BlockProps::Columns {
                count: 2,
                gap: DEFAULT_COLUMN_GAP,
                columns: vec![Column::default(), Column::default()],
            },
            BlockType::Code => BlockProps::Code {
                language: DEFAULT_CODE_LANGUAGE.to_string(),
            },
            BlockType::Video => BlockProps::Video {
                url: String::new(),
                title: None,
            },
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockProps::Paragraph { .. } => BlockType::Paragraph,
            BlockProps::Heading { .. } => BlockType::Heading,
            BlockProps::List { .. } => BlockType::List,
            BlockProps::Quote => BlockType::Quote,
            BlockProps::Image { .. } => BlockType::Image,
            BlockProps::Divider => BlockType::Divider,
            BlockProps::Spacer { .. } => BlockType::Spacer,
            BlockProps::Table { .. } => BlockType::Table,
            BlockProps::Columns { .. } => BlockType::Columns,
            BlockProps::Code { .. } => BlockType::Code,
            BlockProps::Video { .. } => BlockType::Video,
        }
    }
}

/// The atomic unit of document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    /// Body text for paragraph/heading/quote/code, newline-separated items for lists
    pub content: String,
    pub style: Style,
    pub props: BlockProps,
}

impl Block {
    /// A fresh block of `block_type` with default style and properties.
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: BlockId::new(),
            content: String::new(),
            style: default_style(block_type),
            props: BlockProps::defaults(block_type),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_props(mut self, props: BlockProps) -> Self {
        self.props = props;
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.props.block_type()
    }
}

fn default_style(block_type: BlockType) -> Style {
    match block_type {
        BlockType::Paragraph => Style {
            font_size: Some(PARAGRAPH_FONT_SIZE),
            ..Style::default()
        },
        BlockType::Heading => Style {
            font_size: Some(heading_font_size(2)),
            ..Style::default()
        },
        BlockType::Code => Style {
            color: Some(CODE_FOREGROUND.to_string()),
            background_color: Some(CODE_BACKGROUND.to_string()),
            ..Style::default()
        },
        BlockType::Image => Style {
            align: Some(Align::Center),
            ..Style::default()
        },
        _ => Style::default(),
    }
}
