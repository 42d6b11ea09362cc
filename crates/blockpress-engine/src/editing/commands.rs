use crate::editing::{Document, InsertFallback};
use crate::models::{Block, BlockId, BlockProps, BlockType, ColumnKind, Property};

/// Commands that can be applied to the document.
///
/// Every command is total: an unknown id or a command aimed at the wrong
/// block type leaves the document untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    Insert {
        after: BlockId,
        block_type: BlockType,
    },
    Update {
        id: BlockId,
        update: BlockUpdate,
    },
    Delete {
        id: BlockId,
    },
    UpdateTableCell {
        id: BlockId,
        row: usize,
        col: usize,
        value: String,
    },
    Reorder {
        dragged: BlockId,
        target: BlockId,
    },
    UpdateColumn {
        id: BlockId,
        index: usize,
        kind: Option<ColumnKind>,
        content: Option<String>,
    },
    SetActive {
        id: Option<BlockId>,
    },
}

/// Partial update for one block: `content` replaces, `properties` merge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockUpdate {
    pub content: Option<String>,
    pub properties: Vec<Property>,
}

impl BlockUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            properties: Vec::new(),
        }
    }

    pub fn properties(properties: impl IntoIterator<Item = Property>) -> Self {
        Self {
            content: None,
            properties: properties.into_iter().collect(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

/// Apply `cmd` in place. Returns whether the block list changed.
pub(crate) fn apply_command(doc: &mut Document, cmd: Cmd) -> bool {
    match cmd {
        Cmd::Insert { after, block_type } => insert(doc, after, block_type),
        Cmd::Update { id, update } => {
            let Some(block) = doc.block_mut(id) else {
                log::debug!("update: no block {id}");
                return false;
            };
            let before = block.clone();
            if let Some(content) = update.content {
                block.content = content;
            }
            block.merge(update.properties);
            *block != before
        }
        Cmd::Delete { id } => delete(doc, id),
        Cmd::UpdateTableCell {
            id,
            row,
            col,
            value,
        } => update_table_cell(doc, id, row, col, value),
        Cmd::Reorder { dragged, target } => reorder(doc, dragged, target),
        Cmd::UpdateColumn {
            id,
            index,
            kind,
            content,
        } => update_column(doc, id, index, kind, content),
        Cmd::SetActive { id } => {
            match id {
                Some(id) if doc.position(id).is_none() => {
                    log::debug!("set active: no block {id}");
                }
                _ => doc.active = id,
            }
            false
        }
    }
}

fn insert(doc: &mut Document, after: BlockId, block_type: BlockType) -> bool {
    let index = match doc.position(after) {
        Some(index) => index + 1,
        None => match doc.insert_fallback {
            InsertFallback::Append => {
                log::debug!("insert: no block {after}, appending {block_type}");
                doc.blocks.len()
            }
            InsertFallback::Ignore => {
                log::debug!("insert: no block {after}, ignoring");
                return false;
            }
        },
    };
    let block = Block::new(block_type);
    doc.active = Some(block.id);
    doc.blocks.insert(index, block);
    true
}

fn delete(doc: &mut Document, id: BlockId) -> bool {
    let Some(index) = doc.position(id) else {
        log::debug!("delete: no block {id}");
        return false;
    };
    if doc.blocks.len() == 1 {
        log::debug!("delete: refusing to remove the last block");
        return false;
    }
    doc.blocks.remove(index);
    doc.active = None;
    true
}

fn update_table_cell(
    doc: &mut Document,
    id: BlockId,
    row: usize,
    col: usize,
    value: String,
) -> bool {
    let Some(block) = doc.block_mut(id) else {
        log::debug!("table cell: no block {id}");
        return false;
    };
    let block_type = block.block_type();
    let before = block.props.clone();
    let BlockProps::Table { rows, cols, data } = &mut block.props else {
        log::debug!("table cell: block {id} is a {block_type}");
        return false;
    };
    let (Some(min_rows), Some(min_cols)) = (row.checked_add(1), col.checked_add(1)) else {
        log::debug!("table cell: ({row}, {col}) out of range for block {id}");
        return false;
    };

    let height = (*rows).max(data.len()).max(min_rows);
    let width = (*cols)
        .max(data.iter().map(Vec::len).max().unwrap_or_default())
        .max(min_cols);
    data.resize(height, Vec::new());
    for cells in data.iter_mut() {
        cells.resize(width, String::new());
    }
    *rows = height;
    *cols = width;

    data[row][col] = value;
    block.props != before
}

fn reorder(doc: &mut Document, dragged: BlockId, target: BlockId) -> bool {
    if dragged == target {
        return false;
    }
    let (Some(from), Some(to)) = (doc.position(dragged), doc.position(target)) else {
        log::debug!("reorder: unknown block {dragged} or {target}");
        return false;
    };
    if from + 1 == to {
        // Already directly before the target.
        return false;
    }

    let block = doc.blocks.remove(from);
    let to = if from < to { to - 1 } else { to };
    doc.blocks.insert(to, block);
    true
}

fn update_column(
    doc: &mut Document,
    id: BlockId,
    index: usize,
    kind: Option<ColumnKind>,
    content: Option<String>,
) -> bool {
    let Some(block) = doc.block_mut(id) else {
        log::debug!("column: no block {id}");
        return false;
    };
    let block_type = block.block_type();
    let before = block.props.clone();
    let BlockProps::Columns { count, columns, .. } = &mut block.props else {
        log::debug!("column: block {id} is a {block_type}");
        return false;
    };
    let Some(min_len) = index.checked_add(1) else {
        log::debug!("column: index {index} out of range for block {id}");
        return false;
    };

    if columns.len() < min_len {
        columns.resize(min_len, Default::default());
    }
    *count = (*count).max(min_len);
    let column = &mut columns[index];
    if let Some(kind) = kind {
        column.kind = kind;
    }
    if let Some(content) = content {
        column.content = content;
    }
    block.props != before
}
