//! Error types for icon compilation.

use thiserror::Error;

/// Errors that can occur while compiling an SVG source into an icon record.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("missing svg root element in svg file: {file}")]
    MissingSvgRoot { file: String },

    #[error("no path or path-convertible elements found in svg file: {file}")]
    NoPathData { file: String },

    #[error("invalid module id: {0}")]
    InvalidModuleId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
