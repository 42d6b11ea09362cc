pub mod block;
pub mod property;

pub use block::{
    Align, Block, BlockId, BlockProps, BlockType, Column, ColumnKind, ListStyle, Style,
};
pub use property::Property;
