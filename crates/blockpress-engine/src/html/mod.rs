//! The HTML string boundary of the document model.
//!
//! - **`parse`**: classifies the top-level elements of a fragment into blocks
//! - **`render`**: one fixed template per block type
//! - **`video`**: rewrites video page links into embeddable player URLs

pub mod parse;
pub mod render;
pub mod video;

pub use parse::parse_blocks;
pub use render::{render_block, render_blocks};
pub use video::embed_url;
