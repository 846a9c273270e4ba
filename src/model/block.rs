//! Block types.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque block identifier, unique within one job's result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Create an id from a provider string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for BlockId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Block type tag as emitted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// A page of the input document
    Page,
    /// A line of text
    Line,
    /// A single word
    Word,
    /// A table
    Table,
    /// A table cell
    Cell,
    /// A form key or value
    KeyValueSet,
    /// A checkbox or radio button
    SelectionElement,
}

impl BlockType {
    /// Parse the provider's tag. Returns `None` for types this crate does not model.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "PAGE" => Some(BlockType::Page),
            "LINE" => Some(BlockType::Line),
            "WORD" => Some(BlockType::Word),
            "TABLE" => Some(BlockType::Table),
            "CELL" => Some(BlockType::Cell),
            "KEY_VALUE_SET" => Some(BlockType::KeyValueSet),
            "SELECTION_ELEMENT" => Some(BlockType::SelectionElement),
            _ => None,
        }
    }

    /// The provider's tag for this type.
    pub fn as_tag(&self) -> &'static str {
        match self {
            BlockType::Page => "PAGE",
            BlockType::Line => "LINE",
            BlockType::Word => "WORD",
            BlockType::Table => "TABLE",
            BlockType::Cell => "CELL",
            BlockType::KeyValueSet => "KEY_VALUE_SET",
            BlockType::SelectionElement => "SELECTION_ELEMENT",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Role of a key/value set block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// The block is a form key
    Key,
    /// The block is a form value
    Value,
}

/// State of a selection element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    /// Checked
    Selected,
    /// Unchecked
    NotSelected,
}

/// Type-specific payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// A page
    Page,

    /// A line of text
    Line {
        /// Recognized text
        text: String,
    },

    /// A word
    Word {
        /// Recognized text
        text: String,
    },

    /// A table; its children are cells
    Table,

    /// A table cell with 1-based coordinates
    Cell {
        /// Row index (1-based)
        row_index: u32,
        /// Column index (1-based)
        column_index: u32,
    },

    /// A form key or value
    KeyValueSet {
        /// KEY and/or VALUE tags
        entity_types: Vec<EntityType>,
        /// Explicit VALUE relationship targets (usually only on keys)
        value_ids: Vec<BlockId>,
    },

    /// A checkbox or radio button
    SelectionElement {
        /// Selection state
        status: SelectionStatus,
    },
}

/// The atomic unit of provider output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block identifier
    pub id: BlockId,

    /// Originating page (1-indexed)
    pub page: u32,

    /// Ordered CHILD relationship ids
    pub children: Vec<BlockId>,

    /// Type-specific payload
    pub kind: BlockKind,
}

impl Block {
    /// Create a block with no children on page 1.
    pub fn new(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            page: 1,
            children: Vec::new(),
            kind,
        }
    }

    /// Create a word block.
    pub fn word(id: impl Into<BlockId>, text: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Word { text: text.into() })
    }

    /// Create a line block.
    pub fn line(id: impl Into<BlockId>, text: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Line { text: text.into() })
    }

    /// Create a table block.
    pub fn table(id: impl Into<BlockId>) -> Self {
        Self::new(id, BlockKind::Table)
    }

    /// Create a cell block.
    pub fn cell(id: impl Into<BlockId>, row_index: u32, column_index: u32) -> Self {
        Self::new(
            id,
            BlockKind::Cell {
                row_index,
                column_index,
            },
        )
    }

    /// Create a key block.
    pub fn key(id: impl Into<BlockId>) -> Self {
        Self::new(
            id,
            BlockKind::KeyValueSet {
                entity_types: vec![EntityType::Key],
                value_ids: Vec::new(),
            },
        )
    }

    /// Create a value block.
    pub fn value(id: impl Into<BlockId>) -> Self {
        Self::new(
            id,
            BlockKind::KeyValueSet {
                entity_types: vec![EntityType::Value],
                value_ids: Vec::new(),
            },
        )
    }

    /// Create a selection element.
    pub fn selection(id: impl Into<BlockId>, status: SelectionStatus) -> Self {
        Self::new(id, BlockKind::SelectionElement { status })
    }

    /// Set children and return self.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BlockId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Set the originating page and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set explicit VALUE relationship targets and return self.
    ///
    /// Has no effect on blocks that are not key/value sets.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BlockId>,
    {
        if let BlockKind::KeyValueSet { value_ids, .. } = &mut self.kind {
            *value_ids = values.into_iter().map(Into::into).collect();
        }
        self
    }

    /// The block's type tag.
    pub fn block_type(&self) -> BlockType {
        match self.kind {
            BlockKind::Page => BlockType::Page,
            BlockKind::Line { .. } => BlockType::Line,
            BlockKind::Word { .. } => BlockType::Word,
            BlockKind::Table => BlockType::Table,
            BlockKind::Cell { .. } => BlockType::Cell,
            BlockKind::KeyValueSet { .. } => BlockType::KeyValueSet,
            BlockKind::SelectionElement { .. } => BlockType::SelectionElement,
        }
    }

    /// Own text payload (words and lines only).
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Line { text } | BlockKind::Word { text } => Some(text),
            _ => None,
        }
    }

    /// Cell coordinates as `(row, column)`.
    pub fn cell_position(&self) -> Option<(u32, u32)> {
        match self.kind {
            BlockKind::Cell {
                row_index,
                column_index,
            } => Some((row_index, column_index)),
            _ => None,
        }
    }

    /// Check if this is a key/value set tagged KEY.
    pub fn is_key(&self) -> bool {
        self.has_entity(EntityType::Key)
    }

    /// Check if this is a key/value set tagged VALUE.
    pub fn is_value(&self) -> bool {
        self.has_entity(EntityType::Value)
    }

    fn has_entity(&self, entity: EntityType) -> bool {
        matches!(&self.kind, BlockKind::KeyValueSet { entity_types, .. } if entity_types.contains(&entity))
    }
}
