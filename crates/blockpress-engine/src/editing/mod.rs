/*!
 * # Editing Core
 *
 * The document is an ordered list of typed blocks that is never empty.
 *
 * ## Command-based editing
 * - Every edit is a [`Cmd`] applied with [`Document::apply`]
 * - Each application returns a [`Patch`]: whether anything changed, the new
 *   version and the active block
 * - Commands naming unknown blocks, or blocks of the wrong type, are no-ops
 *   logged at `debug`; there is no error channel
 *
 * ## Serialization
 * - [`Document::to_html`] renders the whole document
 * - [`EditSession`] wraps a document and debounces rendering so a burst of
 *   edits yields one HTML string once the editor goes idle
 *
 * ## Usage Pattern
 *
 * ```rust
 * use std::time::{Duration, Instant};
 * use blockpress_engine::editing::*;
 * use blockpress_engine::models::{BlockType, Property};
 *
 * let mut session = EditSession::new(Document::from_html("<p>Hello</p>"), Duration::from_millis(500));
 * let first = session.document().blocks()[0].id;
 * let now = Instant::now();
 *
 * let patch = session.apply(Cmd::Insert { after: first, block_type: BlockType::Heading }, now);
 * let heading = patch.active.unwrap();
 * session.apply(
 *     Cmd::Update {
 *         id: heading,
 *         update: BlockUpdate::content("Title").with_property(Property::Level(1)),
 *     },
 *     now,
 * );
 *
 * assert_eq!(session.poll(now), None);
 * let html = session.poll(now + Duration::from_secs(1)).unwrap();
 * assert!(html.contains("<h1"));
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod session;

pub use commands::{BlockUpdate, Cmd};
pub use document::{Document, InsertFallback};
pub use patch::Patch;
pub use session::{DEFAULT_DEBOUNCE, Debouncer, EditSession};
