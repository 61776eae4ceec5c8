use thiserror::Error;

/// A content block that could not be applied to the entity being extracted.
/// Any of these moves the entity's state machine to `failure`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("attribute settings found before any attribute was declared")]
    NoAttribute,
    #[error("{what} table found but entity has no attributes to apply it to")]
    NoAttributesForTable { what: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("target width must be at least one column")]
    ZeroWidth,
    #[error("heading has {found} cells but {width} are required")]
    HeadingTooShort { found: usize, width: usize },
    #[error("row {row} has {cells} cells but the heading only names {heading}")]
    RowWiderThanHeading {
        row: usize,
        cells: usize,
        heading: usize,
    },
    #[error("row {row} has no cell for column '{column}'")]
    MissingCell { row: usize, column: String },
}
