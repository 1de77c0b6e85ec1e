//! Style resolution.
//!
//! Each node's declarations are decided once from a small table: how the node
//! is placed (from the parent's layout mode), whether it lays out its own
//! children, and what kind of content it carries. Nothing is set and later
//! removed.

use figml_model::{AxisAlign, Color, DesignNode, LayoutAlign, LayoutMode, Rect};

use crate::classify::NodeKind;
use crate::format_number;

// ---------------------------------------------------------------------------
// StyleMap
// ---------------------------------------------------------------------------

/// Insertion-ordered CSS declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(&'static str, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. An existing property keeps its position.
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// `prop: value; prop: value;` as used in a `style` attribute.
    pub fn to_declarations(&self) -> String {
        self.iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Layout context
// ---------------------------------------------------------------------------

/// Which origin absolute coordinates are written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// Bounding-box coordinates verbatim.
    #[default]
    Document,
    /// Offsets from the parent's bounding box.
    Relative,
}

/// What a node knows about its parent while being styled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub parent_is_auto_layout: bool,
    /// Parent's top-left corner, used in [`CoordinateSpace::Relative`].
    pub origin: (f64, f64),
    pub coordinates: CoordinateSpace,
}

impl LayoutContext {
    /// Context in document coordinates.
    pub fn document(parent_is_auto_layout: bool) -> Self {
        Self {
            parent_is_auto_layout,
            origin: (0.0, 0.0),
            coordinates: CoordinateSpace::Document,
        }
    }

    /// Context for the children of `node`.
    pub fn for_children(&self, node: &DesignNode) -> Self {
        Self {
            parent_is_auto_layout: node.is_auto_layout(),
            origin: node
                .absolute_bounding_box
                .map(|b| (b.x, b.y))
                .unwrap_or(self.origin),
            coordinates: self.coordinates,
        }
    }
}

/// How a node sits inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Child of an auto-layout container.
    FlexItem,
    /// `position: absolute` with offsets and size.
    Absolute,
    /// Auto-layout node under a free-form parent in document coordinates:
    /// size only, no offsets.
    Sized,
}

pub fn placement(node: &DesignNode, ctx: &LayoutContext) -> Placement {
    match (
        ctx.parent_is_auto_layout,
        node.is_auto_layout(),
        ctx.coordinates,
    ) {
        (true, _, _) => Placement::FlexItem,
        (false, true, CoordinateSpace::Document) => Placement::Sized,
        (false, _, _) => Placement::Absolute,
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Font size used when a text node carries no usable metric.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Font weight used when a text node carries no usable metric.
pub const DEFAULT_FONT_WEIGHT: f64 = 400.0;

/// Compute the declarations for one node.
pub fn resolve_style(
    node: &DesignNode,
    bbox: &Rect,
    kind: NodeKind,
    ctx: &LayoutContext,
) -> StyleMap {
    let mut styles = StyleMap::new();

    match placement(node, ctx) {
        Placement::FlexItem => {
            if node.layout_grow == Some(1.0) {
                styles.set("flex-grow", "1");
            }
            if node.layout_align == Some(LayoutAlign::Stretch) {
                styles.set("align-self", "stretch");
            } else {
                push_size(&mut styles, bbox);
            }
            if ctx.coordinates == CoordinateSpace::Relative
                && kind == NodeKind::Container
                && !node.is_auto_layout()
            {
                styles.set("position", "relative");
            }
        }
        Placement::Absolute => {
            let (ox, oy) = match ctx.coordinates {
                CoordinateSpace::Document => (0.0, 0.0),
                CoordinateSpace::Relative => ctx.origin,
            };
            styles.set("position", "absolute");
            styles.set("left", px(bbox.x - ox));
            styles.set("top", px(bbox.y - oy));
            push_size(&mut styles, bbox);
        }
        Placement::Sized => push_size(&mut styles, bbox),
    }

    if node.is_auto_layout() {
        push_auto_layout(&mut styles, node);
    }

    if kind == NodeKind::Container {
        if let Some(fill) = node.solid_fill() {
            styles.set("background-color", rgba(fill.color.as_ref()));
        }
    }
    if let Some(stroke) = node.solid_stroke() {
        let weight = node.stroke_weight.filter(|w| *w != 0.0).unwrap_or(1.0);
        styles.set(
            "border",
            format!("{}px solid {}", format_number(weight), rgba(stroke.color.as_ref())),
        );
    }
    if let Some(radius) = node.corner_radius.filter(|r| *r != 0.0) {
        styles.set("border-radius", px(radius));
    }

    if kind == NodeKind::Text {
        let style = node.style.unwrap_or_default();
        styles.set(
            "font-size",
            px(style.font_size.unwrap_or(DEFAULT_FONT_SIZE)),
        );
        styles.set(
            "font-weight",
            format_number(style.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT)),
        );
        if let Some(fill) = node.solid_fill() {
            styles.set("color", rgba(fill.color.as_ref()));
        }
    }

    styles
}

/// Flex container declarations for an auto-layout node.
pub fn push_auto_layout(styles: &mut StyleMap, node: &DesignNode) {
    let direction = match node.layout_mode {
        Some(LayoutMode::Horizontal) => "row",
        _ => "column",
    };
    styles.set("display", "flex");
    styles.set("flex-direction", direction);
    if let Some(gap) = node.item_spacing.filter(|g| *g != 0.0) {
        styles.set("gap", px(gap));
    }
    let [top, right, bottom, left] = node.padding();
    styles.set(
        "padding",
        format!("{} {} {} {}", px(top), px(right), px(bottom), px(left)),
    );
    styles.set("justify-content", map_align(node.primary_axis_align_items));
    styles.set("align-items", map_align(node.counter_axis_align_items));
}

fn push_size(styles: &mut StyleMap, bbox: &Rect) {
    styles.set("width", px(bbox.width));
    styles.set("height", px(bbox.height));
}

pub(crate) fn px(n: f64) -> String {
    format!("{}px", format_number(n))
}

// ---------------------------------------------------------------------------
// Color and alignment
// ---------------------------------------------------------------------------

/// `rgba(…)` for a color, `transparent` when absent.
pub fn rgba(color: Option<&Color>) -> String {
    let Some(c) = color else {
        return "transparent".to_string();
    };
    format!(
        "rgba({}, {}, {}, {})",
        channel(c.r),
        channel(c.g),
        channel(c.b),
        format_number(c.a)
    )
}

fn channel(v: f64) -> i64 {
    (v * 255.0).round() as i64
}

/// Map an axis alignment to a flexbox value. Total: unknown means start.
pub fn map_align(align: Option<AxisAlign>) -> &'static str {
    match align {
        Some(AxisAlign::Min) => "flex-start",
        Some(AxisAlign::Max) => "flex-end",
        Some(AxisAlign::Center) => "center",
        Some(AxisAlign::SpaceBetween) => "space-between",
        _ => "flex-start",
    }
}
