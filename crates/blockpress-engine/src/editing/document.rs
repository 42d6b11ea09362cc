use serde::{Deserialize, Serialize};

use crate::editing::commands::apply_command;
use crate::editing::{BlockUpdate, Cmd, Patch};
use crate::html::{parse_blocks, render_blocks};
use crate::models::{Block, BlockId, BlockType, ColumnKind};

/// What `insert` does when the reference block does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertFallback {
    /// Append the new block at the end of the document
    #[default]
    Append,
    /// Leave the document unchanged
    Ignore,
}

/// An ordered, never-empty list of blocks plus the editor's active block.
///
/// All mutation goes through [`Document::apply`]. Commands referring to
/// unknown blocks are ignored, so there is no error path once a document
/// exists.
///
/// ```rust
/// # use blockpress_engine::editing::{Cmd, Document};
/// # use blockpress_engine::models::BlockType;
/// let mut doc = Document::from_html("<h1>Title</h1><p>Body</p>");
/// let first = doc.blocks()[0].id;
///
/// let patch = doc.apply(Cmd::Insert { after: first, block_type: BlockType::Divider });
/// assert!(patch.changed);
/// assert_eq!(doc.len(), 3);
/// assert!(doc.to_html().contains("<hr"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) active: Option<BlockId>,
    /// Incremented on each change
    pub(crate) version: u64,
    pub(crate) insert_fallback: InsertFallback,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockType::Paragraph)],
            active: None,
            version: 0,
            insert_fallback: InsertFallback::default(),
        }
    }

    /// Parse an HTML fragment.
    ///
    /// Blank input, or markup that yields no blocks at all, gives the same
    /// single empty paragraph as [`Document::new`].
    pub fn from_html(html: &str) -> Self {
        if html.trim().is_empty() {
            return Self::new();
        }
        Self::from_blocks(parse_blocks(html))
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }
        Self {
            blocks,
            ..Self::new()
        }
    }

    pub fn with_insert_fallback(mut self, fallback: InsertFallback) -> Self {
        self.insert_fallback = fallback;
        self
    }

    pub fn to_html(&self) -> String {
        render_blocks(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn active(&self) -> Option<BlockId> {
        self.active
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn insert_fallback(&self) -> InsertFallback {
        self.insert_fallback
    }

    /// Apply a command and report what happened.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let changed = apply_command(self, cmd);
        if changed {
            self.version += 1;
        }
        Patch {
            changed,
            version: self.version,
            active: self.active,
        }
    }

    pub fn insert_block(&mut self, after: BlockId, block_type: BlockType) -> Patch {
        self.apply(Cmd::Insert { after, block_type })
    }

    pub fn update_block(&mut self, id: BlockId, update: BlockUpdate) -> Patch {
        self.apply(Cmd::Update { id, update })
    }

    pub fn delete_block(&mut self, id: BlockId) -> Patch {
        self.apply(Cmd::Delete { id })
    }

    pub fn update_table_cell(
        &mut self,
        id: BlockId,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Patch {
        self.apply(Cmd::UpdateTableCell {
            id,
            row,
            col,
            value: value.into(),
        })
    }

    pub fn reorder(&mut self, dragged: BlockId, target: BlockId) -> Patch {
        self.apply(Cmd::Reorder { dragged, target })
    }

    pub fn update_column(
        &mut self,
        id: BlockId,
        index: usize,
        kind: Option<ColumnKind>,
        content: Option<String>,
    ) -> Patch {
        self.apply(Cmd::UpdateColumn {
            id,
            index,
            kind,
            content,
        })
    }

    pub fn set_active(&mut self, id: Option<BlockId>) -> Patch {
        self.apply(Cmd::SetActive { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockProps, Column, Property};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ids(doc: &Document) -> Vec<BlockId> {
        doc.blocks().iter().map(|block| block.id).collect()
    }

    fn three_paragraphs() -> Document {
        Document::from_html("<p>A</p><p>B</p><p>C</p>")
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t \r\n")]
    #[case("<div></div>")]
    fn blank_input_gives_one_empty_paragraph(#[case] html: &str) {
        let doc = Document::from_html(html);
        assert_eq!(doc.len(), 1);
        let block = &doc.blocks()[0];
        assert_eq!(block.block_type(), BlockType::Paragraph);
        assert_eq!(block.content, "");
    }

    #[test]
    fn insert_places_block_after_reference() {
        let mut doc = three_paragraphs();
        let before = ids(&doc);

        let patch = doc.insert_block(before[0], BlockType::Heading);

        assert!(patch.changed);
        assert_eq!(doc.len(), 4);
        let inserted = doc.blocks()[1].id;
        assert_eq!(patch.active, Some(inserted));
        assert_eq!(doc.active(), Some(inserted));
        assert_eq!(doc.blocks()[1].block_type(), BlockType::Heading);
        assert_eq!(ids(&doc), vec![before[0], inserted, before[1], before[2]]);
    }

    #[test]
    fn insert_after_last_appends() {
        let mut doc = three_paragraphs();
        let last = doc.blocks()[2].id;
        doc.insert_block(last, BlockType::Divider);
        assert_eq!(doc.blocks()[3].block_type(), BlockType::Divider);
    }

    #[test]
    fn insert_with_unknown_reference_follows_fallback() {
        let mut doc = three_paragraphs();
        doc.insert_block(BlockId::new(), BlockType::Spacer);
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.blocks()[3].block_type(), BlockType::Spacer);

        let mut strict = three_paragraphs().with_insert_fallback(InsertFallback::Ignore);
        let patch = strict.insert_block(BlockId::new(), BlockType::Spacer);
        assert!(!patch.changed);
        assert_eq!(strict.len(), 3);
        assert_eq!(patch.active, None);
    }

    #[test]
    fn inserted_table_has_empty_grid() {
        let mut doc = Document::new();
        let first = doc.blocks()[0].id;
        doc.insert_block(first, BlockType::Table);
        assert_eq!(
            doc.blocks()[1].props,
            BlockProps::Table {
                rows: 3,
                cols: 3,
                data: vec![vec![String::new(); 3]; 3],
            }
        );
    }

    #[test]
    fn deleting_the_only_block_is_a_no_op() {
        let mut doc = Document::new();
        let only = doc.blocks()[0].id;

        let patch = doc.delete_block(only);

        assert!(!patch.changed);
        assert_eq!(ids(&doc), vec![only]);
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn delete_removes_block_and_clears_active() {
        let mut doc = three_paragraphs();
        let before = ids(&doc);
        doc.set_active(Some(before[2]));

        let patch = doc.delete_block(before[1]);

        assert!(patch.changed);
        assert_eq!(ids(&doc), vec![before[0], before[2]]);
        assert_eq!(doc.active(), None);
    }

    #[test]
    fn update_merges_properties() {
        let mut doc = Document::new();
        let id = doc.blocks()[0].id;
        doc.update_block(
            id,
            BlockUpdate::properties([
                Property::Bold(true),
                Property::Link(Some("https://example.com".into())),
            ]),
        );

        doc.update_block(id, BlockUpdate::properties([Property::Italic(true)]));

        let block = doc.block(id).unwrap();
        assert!(block.style.bold);
        assert!(block.style.italic);
        assert!(matches!(
            &block.props,
            BlockProps::Paragraph { link: Some(link), .. } if link == "https://example.com"
        ));
    }

    #[test]
    fn update_replaces_content_and_keeps_properties() {
        let mut doc = Document::new();
        let id = doc.blocks()[0].id;
        doc.update_block(id, BlockUpdate::properties([Property::Underline(true)]));

        doc.update_block(id, BlockUpdate::content("new text"));

        let block = doc.block(id).unwrap();
        assert_eq!(block.content, "new text");
        assert!(block.style.underline);
    }

    #[test]
    fn update_of_unknown_block_changes_nothing() {
        let mut doc = three_paragraphs();
        let before = doc.to_html();
        let patch = doc.update_block(BlockId::new(), BlockUpdate::content("x"));
        assert!(!patch.changed);
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn table_cell_update_grows_grid() {
        let mut doc = Document::new();
        let first = doc.blocks()[0].id;
        doc.insert_block(first, BlockType::Table);
        let table = doc.blocks()[1].id;
        doc.update_block(
            table,
            BlockUpdate::properties([Property::TableRows(1), Property::TableCols(1)]),
        );

        let patch = doc.update_table_cell(table, 2, 2, "x");

        assert!(patch.changed);
        let BlockProps::Table { rows, cols, data } = &doc.block(table).unwrap().props else {
            panic!("expected table");
        };
        assert_eq!((*rows, *cols), (3, 3));
        assert!(data.len() >= 3);
        assert!(data.iter().all(|row| row.len() >= 3));
        assert_eq!(data[2][2], "x");
        let filled: Vec<&String> = data.iter().flatten().filter(|cell| !cell.is_empty()).collect();
        assert_eq!(filled, vec!["x"]);
    }

    #[test]
    fn table_cell_update_ignores_other_types() {
        let mut doc = Document::new();
        let id = doc.blocks()[0].id;
        let patch = doc.update_table_cell(id, 0, 0, "x");
        assert!(!patch.changed);
        assert_eq!(doc.blocks()[0].content, "");
    }

    #[rstest]
    #[case::row(usize::MAX, 0)]
    #[case::col(0, usize::MAX)]
    fn table_cell_update_with_overflowing_index_is_a_no_op(
        #[case] row: usize,
        #[case] col: usize,
    ) {
        let mut doc = Document::new();
        let first = doc.blocks()[0].id;
        let table = doc.insert_block(first, BlockType::Table).active.unwrap();
        let before = doc.block(table).unwrap().props.clone();

        let patch = doc.update_table_cell(table, row, col, "x");

        assert!(!patch.changed);
        assert_eq!(doc.block(table).unwrap().props, before);
    }

    #[test]
    fn reorder_moves_before_target() {
        let mut doc = three_paragraphs();
        let [a, b, c] = ids(&doc)[..] else {
            panic!("expected three blocks");
        };

        doc.reorder(c, a);
        assert_eq!(ids(&doc), vec![c, a, b]);

        doc.reorder(c, b);
        assert_eq!(ids(&doc), vec![a, c, b]);
    }

    #[rstest]
    #[case::same_block(0, 0)]
    #[case::already_in_place(0, 1)]
    fn reorder_no_ops(#[case] dragged: usize, #[case] target: usize) {
        let mut doc = three_paragraphs();
        let before = ids(&doc);
        let patch = doc.reorder(before[dragged], before[target]);
        assert!(!patch.changed);
        assert_eq!(ids(&doc), before);
    }

    #[test]
    fn reorder_with_unknown_id_is_a_no_op() {
        let mut doc = three_paragraphs();
        let before = ids(&doc);
        assert!(!doc.reorder(BlockId::new(), before[0]).changed);
        assert!(!doc.reorder(before[0], BlockId::new()).changed);
        assert_eq!(ids(&doc), before);
    }

    #[test]
    fn update_column_grows_and_sets() {
        let mut doc = Document::new();
        let first = doc.blocks()[0].id;
        doc.insert_block(first, BlockType::Columns);
        let id = doc.blocks()[1].id;

        doc.update_column(id, 2, Some(ColumnKind::Image), Some("c.png".into()));

        let BlockProps::Columns { count, columns, .. } = &doc.block(id).unwrap().props else {
            panic!("expected columns");
        };
        assert_eq!(*count, 3);
        assert_eq!(columns[2], Column::new(ColumnKind::Image, "c.png"));
        assert_eq!(columns[0], Column::default());
    }

    #[test]
    fn column_update_with_overflowing_index_is_a_no_op() {
        let mut doc = Document::new();
        let first = doc.blocks()[0].id;
        let id = doc.insert_block(first, BlockType::Columns).active.unwrap();
        let before = doc.block(id).unwrap().props.clone();

        let patch = doc.update_column(id, usize::MAX, None, Some("x".into()));

        assert!(!patch.changed);
        assert_eq!(doc.block(id).unwrap().props, before);
    }

    #[test]
    fn set_active_ignores_unknown_ids() {
        let mut doc = three_paragraphs();
        let id = doc.blocks()[0].id;
        doc.set_active(Some(id));
        doc.set_active(Some(BlockId::new()));
        assert_eq!(doc.active(), Some(id));
        doc.set_active(None);
        assert_eq!(doc.active(), None);
    }

    #[test]
    fn version_only_moves_on_change() {
        let mut doc = three_paragraphs();
        let id = doc.blocks()[0].id;
        assert_eq!(doc.update_block(id, BlockUpdate::content("A")).version, 0);
        assert_eq!(doc.update_block(id, BlockUpdate::content("Z")).version, 1);
        assert_eq!(doc.delete_block(BlockId::new()).version, 1);
    }
}
