//! API response envelopes.
//!
//! The design API answers a whole-file request with `{ "document": … }` and a
//! node request with `{ "nodes": { "<id>": { "document": … } } }`. Both land in
//! [`SourceResponse`] so callers can treat them uniformly.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::node::DesignNode;

/// A file or nodes response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceResponse {
    #[serde(default)]
    pub name: Option<String>,

    /// The full document tree (file responses).
    #[serde(default)]
    pub document: Option<DesignNode>,

    /// Requested sub-trees keyed by id (node responses). The API reports
    /// unknown ids as `null`.
    #[serde(default)]
    pub nodes: Option<BTreeMap<String, Option<NodeEntry>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeEntry {
    pub document: DesignNode,
}

impl SourceResponse {
    /// Look up a sub-tree by (already normalized) id.
    ///
    /// Checks the `nodes` map first, then searches the full document tree.
    pub fn lookup(&self, id: &str) -> Option<&DesignNode> {
        if let Some(entry) = self.nodes.as_ref().and_then(|nodes| nodes.get(id)) {
            return entry.as_ref().map(|e| &e.document);
        }
        self.document.as_ref().and_then(|doc| doc.find(id))
    }

    /// The first page of the document, if any.
    pub fn first_page(&self) -> Option<&DesignNode> {
        self.document.as_ref().and_then(|doc| doc.children.first())
    }
}

/// Normalize a user-supplied node id into the API's `<a>:<b>` form.
///
/// Ids copied from a browser URL arrive percent-encoded or dash-separated
/// (`101-1171`); the API expects `101:1171`. Only the first dash is replaced,
/// and only when no colon is present.
pub fn normalize_node_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let decoded = match urlencoding::decode(trimmed) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => trimmed.to_string(),
    };

    if decoded.contains('-') && !decoded.contains(':') {
        log::debug!("normalizing node id separator: {decoded}");
        decoded.replacen('-', ":", 1)
    } else {
        decoded
    }
}
