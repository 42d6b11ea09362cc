//! Tree construction from lexer tokens.
//!
//! [`TreeBuilder`] keeps a stack of open elements and attaches each finished
//! element to its parent when it closes. It never fails: mismatched end tags
//! are dropped, unclosed elements are closed at end of input, and a handful
//! of implicit-close rules (`<li>` after `<li>`, block content after `<p>`,
//! table cells and rows) keep common hand-written markup sensible.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexer::{Token, TokenKind, lex};
use crate::tree::{Element, Fragment, Node};

/// Maximum number of simultaneously open elements. Start tags beyond this
/// depth are flattened: their children attach to the deepest open element.
pub const MAX_DEPTH: usize = 256;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Start tags that close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "dl",
    "fieldset",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// Parse an HTML fragment into a [`Fragment`]. Never fails.
pub fn parse_fragment(input: &str) -> Fragment {
    let mut builder = TreeBuilder::new();
    for token in lex(input) {
        builder.push(&token);
    }
    builder.finish()
}

/// Incremental tree builder fed one token at a time.
pub struct TreeBuilder {
    /// Open elements; index 0 is the synthetic fragment root
    stack: Vec<Element>,
    /// Names of start tags ignored because of [`MAX_DEPTH`]
    flattened: Vec<String>,
    /// Set while inside a raw text element such as `<script>`
    raw_text: Option<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            stack: vec![Element::new("#fragment")],
            flattened: Vec::new(),
            raw_text: None,
        }
    }

    pub fn push(&mut self, token: &Token<'_>) {
        if let Some(raw) = self.raw_text.clone() {
            if token.kind == TokenKind::EndTag && tag_name(token.text) == raw {
                self.raw_text = None;
                self.close(&raw);
            } else {
                self.append_text(token.text.to_string());
            }
            return;
        }

        match token.kind {
            TokenKind::StartTag => self.open(token.text),
            TokenKind::EndTag => self.close(&tag_name(token.text)),
            TokenKind::Text | TokenKind::Lt => {
                let decoded = html_escape::decode_html_entities(token.text);
                self.append_text(decoded.into_owned());
            }
            TokenKind::Comment | TokenKind::Declaration => {}
        }
    }

    pub fn finish(mut self) -> Fragment {
        while self.stack.len() > 1 {
            self.pop_into_parent();
        }
        let root = self.stack.pop().unwrap_or_default();
        Fragment {
            children: root.children,
        }
    }

    fn open(&mut self, raw: &str) {
        let name = tag_name(raw);
        let attrs = parse_attributes(raw, name.len());
        let self_closing = raw.ends_with("/>");

        self.close_implied_by(&name);

        let element = Element {
            name: name.clone(),
            attrs,
            children: Vec::new(),
        };

        if VOID_ELEMENTS.contains(&name.as_str()) || self_closing {
            self.current().children.push(Node::Element(element));
            return;
        }

        if self.stack.len() > MAX_DEPTH {
            log::debug!("flattening <{name}> beyond depth {MAX_DEPTH}");
            self.flattened.push(name);
            return;
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text = Some(name);
        }
        self.stack.push(element);
    }

    fn close(&mut self, name: &str) {
        if self.flattened.last().is_some_and(|open| open == name) {
            self.flattened.pop();
            return;
        }

        let Some(position) = self.stack.iter().rposition(|el| el.name == name) else {
            log::debug!("ignoring unmatched </{name}>");
            return;
        };
        if position == 0 {
            return;
        }
        while self.stack.len() > position {
            self.pop_into_parent();
        }
    }

    /// Close open elements that the start tag `name` implicitly ends.
    fn close_implied_by(&mut self, name: &str) {
        while self.stack.len() > 1 {
            let open = self.stack.last().map(|el| el.name.as_str()).unwrap_or_default();
            let implied = match open {
                "p" => CLOSES_PARAGRAPH.contains(&name),
                "li" => name == "li",
                "td" | "th" => matches!(name, "td" | "th" | "tr"),
                "tr" => name == "tr",
                "option" => name == "option",
                _ => false,
            };
            if !implied {
                return;
            }
            self.pop_into_parent();
        }
    }

    fn append_text(&mut self, text: String) {
        let current = self.current();
        if let Some(Node::Text(last)) = current.children.last_mut() {
            last.push_str(&text);
        } else {
            current.children.push(Node::Text(text));
        }
    }

    fn pop_into_parent(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.current().children.push(Node::Element(element));
        }
    }

    fn current(&mut self) -> &mut Element {
        // The fragment root is never popped before `finish`
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

/// Lowercase tag name of a start or end tag token.
fn tag_name(raw: &str) -> String {
    raw.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_attributes(raw: &str, name_len: usize) -> Vec<(String, String)> {
    // Skip "<" + name, drop the closing ">" or "/>"
    let body = raw
        .get(1 + name_len..)
        .unwrap_or_default()
        .trim_end_matches('>')
        .trim_end_matches('/');

    ATTRIBUTE
        .captures_iter(body)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| html_escape::decode_html_entities(m.as_str()).into_owned())
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn top_names(fragment: &Fragment) -> Vec<&str> {
        fragment.elements().map(|el| el.name.as_str()).collect()
    }

    #[test]
    fn parses_nested_elements() {
        let fragment = parse_fragment("<div><p>a <b>b</b></p></div>");
        assert_eq!(top_names(&fragment), vec!["div"]);
        let div = fragment.elements().next().unwrap();
        assert_eq!(div.text_content(), "a b");
        assert_eq!(div.descendants().count(), 2);
    }

    #[test]
    fn parses_attributes_in_all_quote_styles() {
        let fragment = parse_fragment(r#"<img SRC="a.png" alt='An &amp; B' width=40 hidden>"#);
        let img = fragment.elements().next().unwrap();
        assert_eq!(img.attr("src"), Some("a.png"));
        assert_eq!(img.attr("alt"), Some("An & B"));
        assert_eq!(img.attr("width"), Some("40"));
        assert_eq!(img.attr("hidden"), Some(""));
    }

    #[test]
    fn decodes_entities_in_text() {
        let fragment = parse_fragment("<p>&lt;tag&gt; &amp; &quot;q&quot;</p>");
        let p = fragment.elements().next().unwrap();
        assert_eq!(p.text_content(), "<tag> & \"q\"");
    }

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let fragment = parse_fragment("<hr><p>after</p>");
        assert_eq!(top_names(&fragment), vec!["hr", "p"]);
    }

    #[rstest]
    #[case("<ul><li>a<li>b</ul>", 2)]
    #[case("<ul><li>a</li><li>b</li><li>c</li></ul>", 3)]
    fn list_items_close_implicitly(#[case] html: &str, #[case] items: usize) {
        let fragment = parse_fragment(html);
        let ul = fragment.elements().next().unwrap();
        assert_eq!(ul.child_elements().filter(|el| el.is("li")).count(), items);
    }

    #[test]
    fn paragraph_closed_by_block_start() {
        let fragment = parse_fragment("<p>one<div>two</div>");
        assert_eq!(top_names(&fragment), vec!["p", "div"]);
    }

    #[test]
    fn table_cells_close_implicitly() {
        let fragment = parse_fragment("<table><tr><td>a<td>b<tr><td>c</table>");
        let table = fragment.elements().next().unwrap();
        let rows: Vec<Vec<String>> = table
            .descendants()
            .filter(|el| el.is("tr"))
            .map(|tr| tr.child_elements().map(Element::text_content).collect())
            .collect();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn unmatched_end_tags_are_ignored() {
        let fragment = parse_fragment("</span><p>x</div></p>");
        assert_eq!(top_names(&fragment), vec!["p"]);
        assert_eq!(fragment.elements().next().unwrap().text_content(), "x");
    }

    #[test]
    fn unclosed_elements_close_at_end() {
        let fragment = parse_fragment("<div><span>open");
        let div = fragment.elements().next().unwrap();
        assert_eq!(div.text_content(), "open");
    }

    #[test]
    fn raw_text_elements_keep_markup_as_text() {
        let fragment = parse_fragment("<script>if (a < b) { x = '<p>'; }</script><p>y</p>");
        assert_eq!(top_names(&fragment), vec!["script", "p"]);
        assert_eq!(
            fragment.elements().next().unwrap().text_content(),
            "if (a < b) { x = '<p>'; }"
        );
    }

    #[test]
    fn deep_nesting_is_flattened() {
        let depth = MAX_DEPTH * 4;
        let html = format!("{}deep{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let fragment = parse_fragment(&html);
        let root = fragment.elements().next().unwrap();
        assert_eq!(root.text_content(), "deep");
        assert!(root.descendants().count() < MAX_DEPTH);
    }

    #[test]
    fn top_level_text_is_kept_as_nodes_but_not_elements() {
        let fragment = parse_fragment("loose <p>x</p> text");
        assert_eq!(fragment.children.len(), 3);
        assert_eq!(top_names(&fragment), vec!["p"]);
    }
}
