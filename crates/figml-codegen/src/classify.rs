//! Node classification.
//!
//! Decides which markup role a node takes, from the node alone.

use figml_model::{DesignNode, NodeType};

/// Components and instances smaller than this on both axes render as icons.
pub const ICON_MAX_SIZE: f64 = 80.0;

/// Markup role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `<p>` with the node's characters.
    Text,
    /// `<img>` pointing at a rendered raster.
    Image,
    /// `<img>` pointing at an exported vector.
    Icon,
    /// `<div>` wrapping the node's children.
    Container,
}

impl NodeKind {
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Text => "p",
            NodeKind::Image | NodeKind::Icon => "img",
            NodeKind::Container => "div",
        }
    }

    /// Only containers render their children.
    pub fn recurses(self) -> bool {
        self == NodeKind::Container
    }
}

/// Classify a node. Precedence is text, image, icon, container.
pub fn classify(node: &DesignNode) -> NodeKind {
    if node.node_type == NodeType::Text {
        NodeKind::Text
    } else if node.has_image_fill() {
        NodeKind::Image
    } else if is_icon(node) {
        NodeKind::Icon
    } else {
        NodeKind::Container
    }
}

fn is_icon(node: &DesignNode) -> bool {
    match node.node_type {
        NodeType::Vector => true,
        NodeType::Component | NodeType::Instance => node
            .absolute_bounding_box
            .is_some_and(|b| b.width < ICON_MAX_SIZE && b.height < ICON_MAX_SIZE),
        _ => false,
    }
}
