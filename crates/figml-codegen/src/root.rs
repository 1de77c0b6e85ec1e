//! Root selection and root container styling.

use figml_model::{normalize_node_id, DesignNode, SourceResponse};

use crate::style::{push_auto_layout, px, rgba, StyleMap};
use crate::CodegenError;

/// Class carried by the root container.
pub const ROOT_CLASS: &str = "figma-root";

/// Pick the tree to render.
///
/// With an id, the (normalized) id must exist in the response. Without one,
/// the document's first page is used.
pub fn select_root<'a>(
    response: &'a SourceResponse,
    node_id: Option<&str>,
) -> Result<&'a DesignNode, CodegenError> {
    match node_id {
        Some(raw) => {
            let id = normalize_node_id(raw);
            log::debug!("selecting node {id}");
            response
                .lookup(&id)
                .ok_or(CodegenError::NotFound { id })
        }
        None => {
            let page = response.first_page().ok_or(CodegenError::EmptyDocument)?;
            log::debug!("selecting first page '{}'", page.name);
            Ok(page)
        }
    }
}

/// Declarations for the root container.
pub fn root_styles(root: &DesignNode) -> StyleMap {
    let mut styles = StyleMap::new();
    styles.set("position", "relative");
    styles.set("overflow", "hidden");

    let background = match (root.solid_fill(), root.background_color.as_ref()) {
        (Some(fill), _) => rgba(fill.color.as_ref()),
        (None, Some(color)) => rgba(Some(color)),
        (None, None) => "rgba(255, 255, 255, 1)".to_string(),
    };
    styles.set("background", background);

    if let Some(b) = root.absolute_bounding_box {
        styles.set("width", px(b.width));
        styles.set("height", px(b.height));
        styles.set("margin", "20px auto");
    }

    if root.is_auto_layout() {
        push_auto_layout(&mut styles, root);
    }
    styles
}
