//! Blocks → HTML serialization.
//!
//! Each block type has one fixed template. Text is escaped with
//! `html-escape`, so parsing the output decodes back to the same text.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::html::video::embed_url;
use crate::models::block::{CODE_BACKGROUND, CODE_FOREGROUND};
use crate::models::{Block, BlockProps, Column, ColumnKind, Style};

const DROP_CAP_STYLE: &str =
    "float:left;font-size:3em;line-height:0.9;margin-right:8px;font-weight:bold";
const INDENT_STYLE: &str = "display:inline-block;text-indent:2em";
const CLEAR_FLOAT: &str = r#"<span style="display:block;clear:both"></span>"#;
const QUOTE_STYLE: &str = "border-left:4px solid #ccc;padding-left:16px;margin:16px 0;font-style:italic";
const DIVIDER: &str = r#"<hr style="border:none;border-top:1px solid #ddd;margin:24px 0">"#;
const TABLE_STYLE: &str = "border-collapse:collapse;width:100%;margin:16px 0";
const CELL_STYLE: &str = "border:1px solid #ddd;padding:8px";
const MEDIA_WRAPPER_MARGIN: &str = "margin:16px 0";

/// Serialize blocks to an HTML fragment, one block per line.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_block(block: &Block) -> String {
    let style = &block.style;
    let content = block.content.as_str();

    match &block.props {
        BlockProps::Heading {
            level,
            drop_cap,
            indent,
        } => {
            let level = (*level).clamp(1, 6);
            format!(
                "<h{level}{}>{}</h{level}>",
                style_attr(&style_declarations(style)),
                inline_text(content, *drop_cap, *indent && !style.indent_all)
            )
        }
        BlockProps::Paragraph {
            link,
            drop_cap,
            indent,
        } => {
            let inner = inline_text(content, *drop_cap, *indent && !style.indent_all);
            let inner = match link {
                Some(href) => format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">{inner}</a>"#,
                    encode_double_quoted_attribute(href)
                ),
                None => inner,
            };
            format!("<p{}>{inner}</p>", style_attr(&style_declarations(style)))
        }
        BlockProps::List {
            ordered,
            list_style,
            indent,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let mut declarations = vec![format!("list-style-type:{}", list_style.as_css())];
            declarations.extend(style_declarations(style));
            let items: String = content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| {
                    if *indent {
                        format!(r#"<li><span style="{INDENT_STYLE}">{}</span></li>"#, encode_text(line))
                    } else {
                        format!("<li>{}</li>", encode_text(line))
                    }
                })
                .collect();
            format!("<{tag}{}>{items}</{tag}>", style_attr(&declarations))
        }
        BlockProps::Quote => {
            let mut declarations = vec![QUOTE_STYLE.to_string()];
            declarations.extend(style_declarations(style));
            format!(
                "<blockquote{}>{}</blockquote>",
                style_attr(&declarations),
                encode_text(content)
            )
        }
        BlockProps::Code { language } => render_code(content, language, style),
        BlockProps::Image { url, alt } => {
            let align = style.align.map(|a| a.as_css()).unwrap_or("center");
            format!(
                r#"<div style="text-align:{align};{MEDIA_WRAPPER_MARGIN}">{}</div>"#,
                image_tag(url, alt)
            )
        }
        BlockProps::Video { url, title } => {
            let heading = title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| format!(r#"<h3 style="margin:0 0 8px">{}</h3>"#, encode_text(t)))
                .unwrap_or_default();
            format!(
                r#"<div style="text-align:center;{MEDIA_WRAPPER_MARGIN}">{heading}<iframe src="{}" width="560" height="315" style="max-width:100%;border:0" allowfullscreen></iframe></div>"#,
                encode_double_quoted_attribute(&embed_url(url))
            )
        }
        BlockProps::Table { data, .. } => render_table(data),
        BlockProps::Columns {
            count,
            gap,
            columns,
        } => render_columns(*count, *gap, columns),
        BlockProps::Spacer { height } => format!(r#"<div style="height:{height}px"></div>"#),
        BlockProps::Divider => DIVIDER.to_string(),
    }
}

/// Inline style declarations derived from the shared presentation attributes.
pub fn style_declarations(style: &Style) -> Vec<String> {
    let mut declarations = Vec::new();
    if let Some(align) = style.align {
        declarations.push(format!("text-align:{}", align.as_css()));
    }
    if let Some(size) = style.font_size {
        declarations.push(format!("font-size:{size}px"));
    }
    if let Some(color) = &style.color {
        declarations.push(format!("color:{color}"));
    }
    if let Some(background) = &style.background_color {
        declarations.push(format!("background-color:{background}"));
    }
    if style.bold {
        declarations.push("font-weight:bold".to_string());
    }
    if style.italic {
        declarations.push("font-style:italic".to_string());
    }
    if style.underline {
        declarations.push("text-decoration:underline".to_string());
    }
    if style.indent_all {
        declarations.push("padding-left:2rem".to_string());
    }
    declarations
}

fn style_attr(declarations: &[String]) -> String {
    if declarations.is_empty() {
        String::new()
    } else {
        format!(
            r#" style="{}""#,
            encode_double_quoted_attribute(&declarations.join(";"))
        )
    }
}

/// Body of a heading or paragraph: drop cap first, then first-line indent.
fn inline_text(content: &str, drop_cap: bool, indent: bool) -> String {
    if drop_cap && let Some(first) = content.chars().next() {
        let (head, rest) = content.split_at(first.len_utf8());
        return format!(
            r#"<span style="{DROP_CAP_STYLE}">{}</span><span>{}</span>{CLEAR_FLOAT}"#,
            encode_text(head),
            encode_text(rest)
        );
    }
    if indent {
        return format!(r#"<span style="{INDENT_STYLE}">{}</span>"#, encode_text(content));
    }
    encode_text(content).into_owned()
}

fn render_code(content: &str, language: &str, style: &Style) -> String {
    let background = style.background_color.as_deref().unwrap_or(CODE_BACKGROUND);
    let foreground = style.color.as_deref().unwrap_or(CODE_FOREGROUND);
    format!(
        concat!(
            r#"<div data-language="{lang_attr}" style="background-color:{bg};color:{fg};border-radius:8px;margin:16px 0;overflow:hidden">"#,
            r#"<div style="display:flex;justify-content:space-between;align-items:center;padding:8px 16px;font-size:12px;opacity:0.8">"#,
            r#"<span>{lang}</span><button type="button" data-copy style="background:none;border:none;color:inherit;cursor:pointer">Copy</button>"#,
            r#"</div>"#,
            r#"<pre style="margin:0;padding:16px;overflow-x:auto"><code>{code}</code></pre>"#,
            r#"</div>"#
        ),
        lang_attr = encode_double_quoted_attribute(language),
        bg = encode_double_quoted_attribute(background),
        fg = encode_double_quoted_attribute(foreground),
        lang = encode_text(language),
        code = encode_text(content),
    )
}

fn image_tag(url: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" style="max-width:100%;height:auto">"#,
        encode_double_quoted_attribute(url),
        encode_double_quoted_attribute(alt)
    )
}

fn render_table(data: &[Vec<String>]) -> String {
    if data.is_empty() {
        return String::new();
    }
    let rows: String = data
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td style="{CELL_STYLE}">{}</td>"#, encode_text(cell)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!(r#"<table style="{TABLE_STYLE}"><tbody>{rows}</tbody></table>"#)
}

fn render_columns(count: usize, gap: u32, columns: &[Column]) -> String {
    let width = column_width(count);
    let empty = Column::default();
    let cells: String = (0..count)
        .map(|index| {
            let column = columns.get(index).unwrap_or(&empty);
            let spacing = if index + 1 < count {
                format!(";padding-right:{gap}px")
            } else {
                String::new()
            };
            format!(
                r#"<div style="display:inline-block;vertical-align:top;width:{width}%;box-sizing:border-box{spacing}">{}</div>"#,
                render_column(column)
            )
        })
        .collect();
    format!(r#"<div style="{MEDIA_WRAPPER_MARGIN}">{cells}</div>"#)
}

fn render_column(column: &Column) -> String {
    let content = column.content.as_str();
    match column.kind {
        ColumnKind::Text => format!(r#"<p style="margin:0">{}</p>"#, encode_text(content)),
        ColumnKind::Image if content.is_empty() => String::new(),
        ColumnKind::Image => image_tag(content, ""),
        ColumnKind::Code => format!(
            r#"<pre style="background-color:{CODE_BACKGROUND};color:{CODE_FOREGROUND};padding:12px;border-radius:6px;overflow-x:auto"><code>{}</code></pre>"#,
            encode_text(content)
        ),
        ColumnKind::Video if content.is_empty() => String::new(),
        ColumnKind::Video => format!(
            r#"<iframe src="{}" style="width:100%;aspect-ratio:16/9;border:0" allowfullscreen></iframe>"#,
            encode_double_quoted_attribute(&embed_url(content))
        ),
    }
}

/// `100 / count` with at most two decimals and no trailing zeros.
fn column_width(count: usize) -> String {
    let width = format!("{:.2}", 100.0 / count.max(1) as f64);
    width
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
