use crate::models::BlockId;

/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Whether the block list changed
    pub changed: bool,
    /// Document version after the command; only bumped by changes
    pub version: u64,
    /// Active block after the command
    pub active: Option<BlockId>,
}
