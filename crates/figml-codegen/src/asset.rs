//! Asset naming and the per-conversion asset manifest.

use std::collections::BTreeMap;

use figml_model::DesignNode;

/// Kind of exported asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Icon,
}

impl AssetKind {
    pub fn dir(self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::Icon => "icons",
        }
    }

    /// File extension, which is also the export format.
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Image => "png",
            AssetKind::Icon => "svg",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            AssetKind::Image => "image-placeholder",
            AssetKind::Icon => "icon-placeholder",
        }
    }
}

/// One image or icon referenced by the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub node_id: String,
    pub name: String,
    pub kind: AssetKind,
    /// Relative path used in `src`, e.g. `./icons/arrow-right.svg`.
    pub path: String,
}

/// Turn a layer name into a path-safe token.
///
/// Lower-cases, keeps `[a-z0-9-]`, turns runs of whitespace and `/` into a
/// single `-`, and trims dashes from both ends. May return an empty string.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            if pending_separator {
                out.push('-');
                pending_separator = false;
            }
            out.push(ch);
        } else if ch.is_whitespace() || ch == '/' {
            pending_separator = true;
        }
    }

    out.trim_matches('-').to_string()
}

/// [`sanitize`] with the kind's placeholder for names that sanitize to nothing.
pub fn asset_name(name: &str, kind: AssetKind) -> String {
    let token = sanitize(name);
    if token.is_empty() {
        kind.placeholder().to_string()
    } else {
        token
    }
}

/// `./<dir>/<name>.<ext>` for a layer name.
pub fn asset_path(name: &str, kind: AssetKind) -> String {
    format!(
        "./{}/{}.{}",
        kind.dir(),
        asset_name(name, kind),
        kind.extension()
    )
}

/// Assets referenced during one conversion, in emission order.
#[derive(Debug, Default)]
pub struct AssetManifest {
    entries: Vec<AssetRef>,
    owners: BTreeMap<String, Vec<String>>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `node` as an asset of `kind` and return its relative path.
    pub fn record(&mut self, node: &DesignNode, kind: AssetKind) -> String {
        let path = asset_path(&node.name, kind);

        let owners = self.owners.entry(path.clone()).or_default();
        if !owners.contains(&node.id) {
            owners.push(node.id.clone());
        }

        self.entries.push(AssetRef {
            node_id: node.id.clone(),
            name: node.name.clone(),
            kind,
            path: path.clone(),
        });
        path
    }

    /// Paths claimed by more than one node.
    pub fn collisions(&self) -> Vec<&str> {
        self.owners
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(path, _)| path.as_str())
            .collect()
    }

    pub fn entries(&self) -> &[AssetRef] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<AssetRef> {
        self.entries
    }
}
