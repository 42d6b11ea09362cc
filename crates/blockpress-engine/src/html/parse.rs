//! HTML → Blocks.
//!
//! Only the top-level elements of the fragment are classified; each one
//! yields at most one block. Rules are tried in a fixed order and the first
//! match wins. Descendant lookups are used to classify an element, never to
//! produce further blocks from its children.

use blockpress_syntax::{Element, parse_fragment};

use crate::models::block::{
    CODE_BACKGROUND, CODE_FOREGROUND, DEFAULT_CODE_LANGUAGE, DEFAULT_COLUMN_GAP,
    DEFAULT_SPACER_HEIGHT, DEFAULT_TABLE_COLS, PARAGRAPH_FONT_SIZE, heading_font_size,
};
use crate::models::{Align, Block, BlockProps, BlockType, Column, ColumnKind, ListStyle};

/// Parse an HTML fragment into blocks. May return an empty list.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let fragment = parse_fragment(html);
    fragment
        .elements()
        .filter_map(|element| {
            let block = classify(element);
            if block.is_none() {
                log::debug!("skipping empty top-level <{}>", element.name);
            }
            block
        })
        .collect()
}

fn classify(el: &Element) -> Option<Block> {
    if let Some(level) = heading_level(&el.name) {
        return Some(heading(el, level));
    }
    match el.name.as_str() {
        "p" => return Some(paragraph(el)),
        "ul" | "ol" => return Some(list(el)),
        "blockquote" => return Some(Block::new(BlockType::Quote).with_content(el.text_content())),
        _ => {}
    }
    if el.is("pre") || el.find_self_or_descendant(&["code"]).is_some() {
        return Some(code(el));
    }
    if el.is("hr") {
        return Some(Block::new(BlockType::Divider));
    }

    let columns = column_elements(el);
    if columns.is_empty()
        && let Some(img) = el.find_self_or_descendant(&["img"])
    {
        return Some(image(img));
    }
    if let Some(table) = el.find_self_or_descendant(&["table"]) {
        return Some(self::table(table));
    }
    if !columns.is_empty() {
        return Some(self::columns(&columns));
    }
    if let Some(iframe) = el.find_self_or_descendant(&["iframe"]) {
        return Some(video(el, iframe));
    }
    if let Some(height) = pixel_height(el) {
        return Some(
            Block::new(BlockType::Spacer).with_props(BlockProps::Spacer { height }),
        );
    }

    let text = el.text_content();
    if text.trim().is_empty() {
        return None;
    }
    Some(plain_paragraph(text))
}

fn heading_level(name: &str) -> Option<u8> {
    let digit = name.strip_prefix('h')?;
    match digit {
        "1" | "2" | "3" | "4" | "5" | "6" => Some(digit.parse().unwrap_or(1)),
        _ => None,
    }
}

fn heading(el: &Element, level: u8) -> Block {
    let mut block = Block::new(BlockType::Heading)
        .with_content(el.text_content())
        .with_props(BlockProps::Heading {
            level,
            drop_cap: false,
            indent: false,
        });
    block.style.font_size = Some(heading_font_size(level));
    block
}

fn paragraph(el: &Element) -> Block {
    let mut block = plain_paragraph(el.text_content());
    let link = el
        .find(&["a"])
        .and_then(|a| a.attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string);
    block.props = BlockProps::Paragraph {
        link,
        drop_cap: false,
        indent: false,
    };
    block
}

fn plain_paragraph(text: String) -> Block {
    let mut block = Block::new(BlockType::Paragraph).with_content(text);
    block.style.font_size = Some(PARAGRAPH_FONT_SIZE);
    block
}

fn list(el: &Element) -> Block {
    let ordered = el.is("ol");
    let list_style = el
        .style_value("list-style-type")
        .and_then(ListStyle::from_css)
        .unwrap_or(ListStyle::default_for(ordered));
    let items: Vec<String> = el
        .child_elements()
        .filter(|child| child.is("li"))
        .map(Element::text_content)
        .collect();

    Block::new(BlockType::List)
        .with_content(items.join("\n"))
        .with_props(BlockProps::List {
            ordered,
            list_style,
            indent: false,
        })
}

fn code(el: &Element) -> Block {
    let code = el.find_self_or_descendant(&["code"]);
    let content = code.unwrap_or(el).text_content();
    let language = el
        .attr("data-language")
        .or_else(|| code.and_then(language_class))
        .filter(|lang| !lang.trim().is_empty())
        .unwrap_or(DEFAULT_CODE_LANGUAGE)
        .to_string();

    let mut block = Block::new(BlockType::Code)
        .with_content(content)
        .with_props(BlockProps::Code { language });
    block.style.background_color = Some(CODE_BACKGROUND.to_string());
    block.style.color = Some(CODE_FOREGROUND.to_string());
    block
}

/// `rust` from `<code class="language-rust">`.
fn language_class(code: &Element) -> Option<&str> {
    code.attr("class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
}

fn image(img: &Element) -> Block {
    let mut block = Block::new(BlockType::Image).with_props(BlockProps::Image {
        url: img.attr("src").unwrap_or_default().to_string(),
        alt: img.attr("alt").unwrap_or_default().to_string(),
    });
    block.style.align = Some(Align::Center);
    block
}

fn table(table: &Element) -> Block {
    let data: Vec<Vec<String>> = table
        .descendants()
        .filter(|el| el.is("tr"))
        .map(|tr| {
            tr.child_elements()
                .filter(|cell| cell.is("td") || cell.is("th"))
                .map(Element::text_content)
                .collect()
        })
        .collect();
    let cols = data
        .first()
        .map(Vec::len)
        .filter(|len| *len > 0)
        .unwrap_or(DEFAULT_TABLE_COLS);

    Block::new(BlockType::Table).with_props(BlockProps::Table {
        rows: data.len(),
        cols,
        data,
    })
}

fn is_column(el: &Element) -> bool {
    el.is("div")
        && el
            .style_value("display")
            .is_some_and(|display| display.eq_ignore_ascii_case("inline-block"))
}

/// Inline-block `div`s below `el`, outermost only, in document order.
fn column_elements(el: &Element) -> Vec<&Element> {
    let mut found = Vec::new();
    let mut pending: Vec<&Element> = el.child_elements().collect();
    pending.reverse();

    while let Some(candidate) = pending.pop() {
        if is_column(candidate) {
            found.push(candidate);
        } else {
            let start = pending.len();
            pending.extend(candidate.child_elements());
            pending[start..].reverse();
        }
    }
    found
}

fn columns(elements: &[&Element]) -> Block {
    let columns: Vec<Column> = elements.iter().map(|el| column(el)).collect();
    Block::new(BlockType::Columns).with_props(BlockProps::Columns {
        count: columns.len(),
        gap: DEFAULT_COLUMN_GAP,
        columns,
    })
}

fn column(el: &Element) -> Column {
    if let Some(img) = el.find(&["img"]) {
        return Column::new(ColumnKind::Image, img.attr("src").unwrap_or_default());
    }
    if let Some(code) = el.find(&["code", "pre"]) {
        let source = el.find(&["code"]).unwrap_or(code);
        return Column::new(ColumnKind::Code, source.text_content());
    }
    if let Some(iframe) = el.find(&["iframe"]) {
        return Column::new(ColumnKind::Video, iframe.attr("src").unwrap_or_default());
    }
    Column::new(ColumnKind::Text, el.text_content())
}

fn video(el: &Element, iframe: &Element) -> Block {
    let title = el
        .find(&["h1", "h2", "h3", "h4", "h5", "h6"])
        .map(Element::text_content)
        .filter(|title| !title.trim().is_empty());
    Block::new(BlockType::Video).with_props(BlockProps::Video {
        url: iframe.attr("src").unwrap_or_default().to_string(),
        title,
    })
}

/// Height from an inline `height: Npx` declaration; 40 when the number is unreadable.
fn pixel_height(el: &Element) -> Option<u32> {
    let value = el.style_value("height")?.to_ascii_lowercase();
    let number = value.strip_suffix("px")?;
    Some(
        number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|px| px.is_finite() && *px >= 0.0)
            .map(|px| px.round() as u32)
            .unwrap_or(DEFAULT_SPACER_HEIGHT),
    )
}
