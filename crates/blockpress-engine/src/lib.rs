pub mod editing;
pub mod html;
pub mod io;
pub mod models;

// Re-export key types for easier usage
pub use editing::{BlockUpdate, Cmd, Document, EditSession, InsertFallback, Patch};
pub use io::*;
pub use models::{Block, BlockId, BlockProps, BlockType, Property};
