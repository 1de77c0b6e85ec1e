//! figml Model
//!
//! Typed view of the JSON documents returned by the design API.
//! Deserialization is the validation boundary: node types, layout modes and
//! paint kinds are closed enums with an `Other` fallback. Malformed fields
//! (ids, colors, bounding boxes, font metrics) fall back to empty, and
//! non-node children are dropped, with a warning instead of failing the
//! whole document.
//!
//! # Example
//!
//! ```
//! let response = figml_model::parse_response(r#"{ "document": { "id": "0:0", "type": "DOCUMENT" } }"#).unwrap();
//! assert!(response.document.is_some());
//! ```

pub mod node;
pub mod response;

pub use node::{
    AxisAlign, Color, DesignNode, LayoutAlign, LayoutMode, NodeType, Paint, PaintType, Rect,
    TypeStyle,
};
pub use response::{normalize_node_id, NodeEntry, SourceResponse};

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        let full = err.to_string();
        let suffix = format!(" at line {line} column {column}");
        let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();
        Self {
            message,
            line,
            column,
        }
    }
}

/// Parse a file or nodes response body.
pub fn parse_response(json: &str) -> Result<SourceResponse, ParseError> {
    Ok(serde_json::from_str(json)?)
}
