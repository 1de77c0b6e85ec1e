//! Design node types.
//!
//! Mirrors the subset of the design API's node schema that the converter
//! reads. Every field goes through [`lenient`] or one of its variants so a
//! malformed value degrades to "absent" rather than rejecting the document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// One node of the design tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_or_default")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "lenient_or_default")]
    pub node_type: NodeType,

    #[serde(default, deserialize_with = "lenient")]
    pub visible: Option<bool>,

    /// Absolute document-space rectangle. `None` means "not renderable".
    #[serde(default, alias = "boundingBox", deserialize_with = "lenient")]
    pub absolute_bounding_box: Option<Rect>,

    #[serde(default, deserialize_with = "lenient")]
    pub layout_mode: Option<LayoutMode>,

    #[serde(default, deserialize_with = "lenient")]
    pub layout_grow: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub layout_align: Option<LayoutAlign>,

    #[serde(default, deserialize_with = "lenient")]
    pub item_spacing: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub padding_top: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub padding_right: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub padding_bottom: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub padding_left: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub primary_axis_align_items: Option<AxisAlign>,

    #[serde(default, deserialize_with = "lenient")]
    pub counter_axis_align_items: Option<AxisAlign>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub fills: Vec<Paint>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub strokes: Vec<Paint>,

    #[serde(default, deserialize_with = "lenient")]
    pub stroke_weight: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub corner_radius: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub background_color: Option<Color>,

    /// Text content, present on `TEXT` nodes only.
    #[serde(default, deserialize_with = "lenient")]
    pub characters: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub style: Option<TypeStyle>,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    /// `false` only when the node is explicitly hidden.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Visible and positioned. Anything else produces no markup.
    pub fn is_renderable(&self) -> bool {
        self.is_visible() && self.absolute_bounding_box.is_some()
    }

    /// Whether this node lays its children out along an axis.
    pub fn is_auto_layout(&self) -> bool {
        matches!(
            self.layout_mode,
            Some(LayoutMode::Horizontal) | Some(LayoutMode::Vertical)
        )
    }

    /// The top-most fill, when it is a solid color.
    pub fn solid_fill(&self) -> Option<&Paint> {
        self.fills.first().filter(|p| p.paint_type == PaintType::Solid)
    }

    /// The top-most stroke, when it is a solid color.
    pub fn solid_stroke(&self) -> Option<&Paint> {
        self.strokes.first().filter(|p| p.paint_type == PaintType::Solid)
    }

    pub fn has_image_fill(&self) -> bool {
        self.fills.iter().any(|p| p.paint_type == PaintType::Image)
    }

    /// Padding as `[top, right, bottom, left]`, missing sides are zero.
    pub fn padding(&self) -> [f64; 4] {
        [
            self.padding_top.unwrap_or(0.0),
            self.padding_right.unwrap_or(0.0),
            self.padding_bottom.unwrap_or(0.0),
            self.padding_left.unwrap_or(0.0),
        ]
    }

    /// Depth-first search for a node by id, including `self`.
    pub fn find(&self, id: &str) -> Option<&DesignNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Node type tag. Only a handful are special-cased by the converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    Star,
    RegularPolygon,
    BooleanOperation,
    Component,
    ComponentSet,
    Instance,
    Slice,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    None,
    Horizontal,
    Vertical,
    #[serde(other)]
    Other,
}

/// How a child behaves on the counter axis of its auto-layout parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutAlign {
    Inherit,
    Stretch,
    Min,
    Center,
    Max,
    #[serde(other)]
    Other,
}

/// Primary/counter axis alignment of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    Min,
    Max,
    Center,
    SpaceBetween,
    Baseline,
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Geometry and paint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A paint layer. Only `SOLID` carries a color the converter uses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default, deserialize_with = "lenient")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Emoji,
    Video,
    #[serde(other)]
    Other,
}

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default, deserialize_with = "lenient")]
    pub font_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub font_weight: Option<f64>,
}

// ---------------------------------------------------------------------------
// Lenient deserialization
// ---------------------------------------------------------------------------

/// Deserialize an optional field, mapping a malformed value to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(recover::<T>))
}

/// Like [`lenient`], falling back to `T::default()`.
fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Deserialize a list, dropping elements that do not match `T`.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let items = match value {
        Some(serde_json::Value::Array(items)) => items,
        None => return Ok(Vec::new()),
        Some(other) => {
            log::warn!("ignoring malformed list: expected array, got {other}");
            return Ok(Vec::new());
        }
    };
    Ok(items.into_iter().filter_map(recover::<T>).collect())
}

fn recover<T: DeserializeOwned>(value: serde_json::Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!(
                "ignoring malformed {}: {e}",
                std::any::type_name::<T>().rsplit("::").next().unwrap_or("value")
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(value: serde_json::Value) -> DesignNode {
        serde_json::from_value(value).unwrap()
    }

    // =========================================================================
    // Type tags
    // =========================================================================

    #[test]
    fn test_known_types() {
        assert_eq!(node(json!({ "type": "TEXT" })).node_type, NodeType::Text);
        assert_eq!(node(json!({ "type": "VECTOR" })).node_type, NodeType::Vector);
        assert_eq!(
            node(json!({ "type": "BOOLEAN_OPERATION" })).node_type,
            NodeType::BooleanOperation
        );
        assert_eq!(
            node(json!({ "type": "COMPONENT_SET" })).node_type,
            NodeType::ComponentSet
        );
    }

    #[test]
    fn test_unknown_type_is_other() {
        assert_eq!(
            node(json!({ "type": "WASHI_TAPE" })).node_type,
            NodeType::Other
        );
        assert_eq!(node(json!({})).node_type, NodeType::Other);
    }

    #[test]
    fn test_layout_enums() {
        let n = node(json!({
            "layoutMode": "HORIZONTAL",
            "layoutAlign": "STRETCH",
            "primaryAxisAlignItems": "SPACE_BETWEEN",
            "counterAxisAlignItems": "SOMETHING_NEW"
        }));
        assert_eq!(n.layout_mode, Some(LayoutMode::Horizontal));
        assert_eq!(n.layout_align, Some(LayoutAlign::Stretch));
        assert_eq!(n.primary_axis_align_items, Some(AxisAlign::SpaceBetween));
        assert_eq!(n.counter_axis_align_items, Some(AxisAlign::Other));
        assert!(n.is_auto_layout());
    }

    #[test]
    fn test_layout_mode_none_is_not_auto_layout() {
        assert!(!node(json!({ "layoutMode": "NONE" })).is_auto_layout());
        assert!(!node(json!({ "layoutMode": "GRID" })).is_auto_layout());
        assert!(!node(json!({})).is_auto_layout());
    }

    // =========================================================================
    // Visibility and bounding box
    // =========================================================================

    #[test]
    fn test_visibility() {
        assert!(node(json!({})).is_visible());
        assert!(node(json!({ "visible": true })).is_visible());
        assert!(!node(json!({ "visible": false })).is_visible());
    }

    #[test]
    fn test_bounding_box_alias() {
        let n = node(json!({ "boundingBox": { "x": 1, "y": 2, "width": 3, "height": 4 } }));
        assert_eq!(
            n.absolute_bounding_box,
            Some(Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 })
        );
        assert!(n.is_renderable());
    }

    #[test]
    fn test_malformed_bounding_box_is_absent() {
        let n = node(json!({ "absoluteBoundingBox": { "x": 1, "y": 2 } }));
        assert_eq!(n.absolute_bounding_box, None);
        assert!(!n.is_renderable());
    }

    #[test]
    fn test_hidden_node_not_renderable() {
        let n = node(json!({
            "visible": false,
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 3, "height": 4 }
        }));
        assert!(!n.is_renderable());
    }

    // =========================================================================
    // Paints
    // =========================================================================

    #[test]
    fn test_color_alpha_defaults_to_one() {
        let n = node(json!({ "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 0.5, "b": 0 } }] }));
        let color = n.solid_fill().unwrap().color.unwrap();
        assert_eq!(color, Color { r: 1.0, g: 0.5, b: 0.0, a: 1.0 });
    }

    #[test]
    fn test_malformed_color_is_absent() {
        let n = node(json!({ "fills": [{ "type": "SOLID", "color": { "r": "red" } }] }));
        let fill = n.solid_fill().unwrap();
        assert_eq!(fill.color, None);
    }

    #[test]
    fn test_malformed_paint_dropped() {
        let n = node(json!({
            "fills": [{ "color": { "r": 1, "g": 1, "b": 1 } }, { "type": "IMAGE" }]
        }));
        assert_eq!(n.fills.len(), 1);
        assert!(n.has_image_fill());
    }

    #[test]
    fn test_fills_not_array() {
        let n = node(json!({ "fills": "SOLID" }));
        assert!(n.fills.is_empty());
    }

    #[test]
    fn test_solid_fill_only_when_first() {
        let n = node(json!({
            "fills": [
                { "type": "GRADIENT_LINEAR" },
                { "type": "SOLID", "color": { "r": 0, "g": 0, "b": 0 } }
            ]
        }));
        assert!(n.solid_fill().is_none());
    }

    #[test]
    fn test_solid_stroke() {
        let n = node(json!({
            "strokes": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 1, "a": 0.5 } }],
            "strokeWeight": 2
        }));
        assert_eq!(n.solid_stroke().unwrap().color.unwrap().a, 0.5);
        assert_eq!(n.stroke_weight, Some(2.0));
    }

    // =========================================================================
    // Text and metrics
    // =========================================================================

    #[test]
    fn test_text_style() {
        let n = node(json!({
            "type": "TEXT",
            "characters": "Hi",
            "style": { "fontSize": 24, "fontWeight": 700, "fontFamily": "Inter" }
        }));
        assert_eq!(n.characters.as_deref(), Some("Hi"));
        let style = n.style.unwrap();
        assert_eq!(style.font_size, Some(24.0));
        assert_eq!(style.font_weight, Some(700.0));
    }

    #[test]
    fn test_malformed_font_metric() {
        let n = node(json!({ "style": { "fontSize": "big", "fontWeight": 500 } }));
        let style = n.style.unwrap();
        assert_eq!(style.font_size, None);
        assert_eq!(style.font_weight, Some(500.0));
    }

    #[test]
    fn test_padding_defaults() {
        let n = node(json!({ "paddingTop": 4, "paddingLeft": "x" }));
        assert_eq!(n.padding(), [4.0, 0.0, 0.0, 0.0]);
    }

    // =========================================================================
    // Malformed nodes
    // =========================================================================

    fn page_with(bad: serde_json::Value) -> DesignNode {
        node(json!({
            "id": "0:1",
            "type": "CANVAS",
            "children": [
                bad,
                { "id": "1:1", "type": "TEXT", "characters": "kept" }
            ]
        }))
    }

    fn kept(page: &DesignNode) -> bool {
        page.children
            .iter()
            .any(|c| c.characters.as_deref() == Some("kept"))
    }

    #[test]
    fn test_non_string_id() {
        let page = page_with(json!({ "id": 42, "name": "Box" }));
        assert_eq!(page.children[0].id, "");
        assert_eq!(page.children[0].name, "Box");
        assert!(kept(&page));
    }

    #[test]
    fn test_null_name() {
        let page = page_with(json!({ "id": "2:1", "name": null }));
        assert_eq!(page.children[0].name, "");
        assert!(kept(&page));
    }

    #[test]
    fn test_null_or_numeric_type() {
        let page = page_with(json!({ "id": "2:1", "type": null }));
        assert_eq!(page.children[0].node_type, NodeType::Other);
        assert!(kept(&page));

        let page = page_with(json!({ "id": "2:1", "type": 7 }));
        assert_eq!(page.children[0].node_type, NodeType::Other);
    }

    #[test]
    fn test_null_children() {
        let page = page_with(json!({ "id": "2:1", "children": null }));
        assert!(page.children[0].children.is_empty());
        assert!(kept(&page));
    }

    #[test]
    fn test_non_node_children_dropped() {
        let page = page_with(json!({
            "id": "2:1",
            "children": [42, "x", { "id": "2:2" }]
        }));
        let ids: Vec<&str> = page.children[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2:2"]);
        assert!(kept(&page));
    }

    #[test]
    fn test_non_node_sibling_dropped() {
        let page = page_with(json!(42));
        assert_eq!(page.children.len(), 1);
        assert!(kept(&page));
    }

    // =========================================================================
    // Tree search
    // =========================================================================

    #[test]
    fn test_find_nested() {
        let n = node(json!({
            "id": "0:1",
            "children": [
                { "id": "1:1", "children": [{ "id": "1:2", "name": "Deep" }] },
                { "id": "1:3" }
            ]
        }));
        assert_eq!(n.find("1:2").unwrap().name, "Deep");
        assert_eq!(n.find("0:1").unwrap().id, "0:1");
        assert!(n.find("9:9").is_none());
    }

    #[test]
    fn test_children_order_preserved() {
        let n = node(json!({ "children": [{ "id": "a" }, { "id": "b" }, { "id": "c" }] }));
        let ids: Vec<&str> = n.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
