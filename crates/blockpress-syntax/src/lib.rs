//! # blockpress-syntax
//!
//! A tolerant HTML fragment parser producing a small owned element tree.
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → TreeBuilder → Fragment
//!               (Logos)          (open-element stack)
//! ```
//!
//! The lexer ([`lexer`]) splits input into start tags, end tags, comments,
//! declarations and text runs. The builder ([`builder`]) keeps a stack of
//! open elements and never fails: malformed markup produces a valid (if
//! imperfect) tree. Tree traversal ([`tree`]) is iterative throughout, and
//! nesting beyond [`MAX_DEPTH`] is flattened, so pathological input cannot
//! overflow the stack.
//!
//! ## Quick Start
//!
//! ```
//! use blockpress_syntax::parse_fragment;
//!
//! let fragment = parse_fragment("<h2>Title</h2>\n<p>Body &amp; more</p>");
//! let names: Vec<_> = fragment.elements().map(|el| el.name.as_str()).collect();
//! assert_eq!(names, ["h2", "p"]);
//!
//! let body = fragment.elements().nth(1).unwrap();
//! assert_eq!(body.text_content(), "Body & more");
//! ```

pub mod builder;
pub mod lexer;
pub mod tree;

pub use builder::{MAX_DEPTH, TreeBuilder, parse_fragment};
pub use tree::{Element, Fragment, Node};
