//! HTML code generator.
//!
//! Walks the design tree depth-first and writes one element per renderable
//! node. Hidden and unpositioned nodes are skipped together with their
//! subtrees. Images and icons are recorded in the asset manifest as they are
//! emitted.

use figml_model::DesignNode;

use crate::asset::AssetKind;
use crate::classify::{classify, NodeKind};
use crate::root::{root_styles, ROOT_CLASS};
use crate::style::{resolve_style, LayoutContext, StyleMap};
use crate::{CompilationContext, StyleMode};

/// Generate the root container and everything under it.
pub fn generate(root: &DesignNode, ctx: &mut CompilationContext) -> String {
    let mut html = String::new();
    let styles = root_styles(root);

    html.push_str(&format!("<div class=\"{ROOT_CLASS}\""));
    match ctx.options.style_mode {
        StyleMode::Inline => {
            html.push_str(&format!(" style=\"{}\"", styles.to_declarations()));
        }
        StyleMode::Stylesheet => ctx.stylesheet.add_rule(ROOT_CLASS, &styles),
    }
    html.push_str(">\n");

    let layout = LayoutContext {
        parent_is_auto_layout: root.is_auto_layout(),
        origin: root
            .absolute_bounding_box
            .map(|b| (b.x, b.y))
            .unwrap_or((0.0, 0.0)),
        coordinates: ctx.options.coordinates,
    };
    for child in &root.children {
        generate_node(child, &layout, ctx, &mut html, 1);
    }

    html.push_str("</div>\n");
    html
}

/// Emit a single node (and its subtree) with inline styles and document
/// coordinates. Returns an empty string for hidden or unpositioned nodes.
pub fn emit(node: &DesignNode, parent_is_auto_layout: bool) -> String {
    let mut ctx = CompilationContext::default();
    let mut out = String::new();
    generate_node(
        node,
        &LayoutContext::document(parent_is_auto_layout),
        &mut ctx,
        &mut out,
        0,
    );
    out
}

fn generate_node(
    node: &DesignNode,
    layout: &LayoutContext,
    ctx: &mut CompilationContext,
    out: &mut String,
    depth: usize,
) {
    let bbox = match node.absolute_bounding_box {
        Some(b) if node.is_renderable() => b,
        _ => {
            log::trace!("skipping {} '{}'", node.id, node.name);
            return;
        }
    };

    let kind = classify(node);
    let styles = resolve_style(node, &bbox, kind, layout);
    let tag = kind.tag();
    let indent = "  ".repeat(depth);
    log::trace!("emit {} '{}' as {kind:?}", node.id, node.name);

    // Opening tag
    out.push_str(&indent);
    out.push('<');
    out.push_str(tag);

    match kind {
        NodeKind::Image => {
            let src = asset_src(node, AssetKind::Image, ctx);
            let name = escape_attr(&node.name);
            out.push_str(&format!(
                " src=\"{src}\" alt=\"{name}\" data-figma-name=\"{name}\""
            ));
        }
        NodeKind::Icon => {
            let src = asset_src(node, AssetKind::Icon, ctx);
            out.push_str(&format!(" src=\"{src}\" alt=\"{}\"", escape_attr(&node.name)));
        }
        NodeKind::Text | NodeKind::Container => {}
    }

    push_style_attr(&styles, ctx, out);
    out.push('>');

    // Content: exactly one of text, nothing (void), or children
    if kind.recurses() {
        let child_layout = layout.for_children(node);
        let mut inner = String::new();
        for child in &node.children {
            generate_node(child, &child_layout, ctx, &mut inner, depth + 1);
        }
        if !inner.is_empty() {
            out.push('\n');
            out.push_str(&inner);
            out.push_str(&indent);
        }
    } else if kind == NodeKind::Text {
        out.push_str(&text_content(node));
    } else {
        out.push('\n');
        return;
    }

    // Closing tag
    out.push_str(&format!("</{tag}>"));
    out.push('\n');
}

/// Write `style="…"` or, in stylesheet mode, `class="…"`.
fn push_style_attr(styles: &StyleMap, ctx: &mut CompilationContext, out: &mut String) {
    match ctx.options.style_mode {
        StyleMode::Inline => {
            out.push_str(&format!(" style=\"{}\"", styles.to_declarations()));
        }
        StyleMode::Stylesheet => {
            if !styles.is_empty() {
                let class = ctx.stylesheet.class_for(styles);
                out.push_str(&format!(" class=\"{class}\""));
            }
        }
    }
}

/// Resolved URL when the caller supplied one, else the relative asset path.
fn asset_src(node: &DesignNode, kind: AssetKind, ctx: &mut CompilationContext) -> String {
    let path = ctx.assets.record(node, kind);
    match ctx.options.asset_urls.get(&node.id) {
        Some(url) => escape_attr(url),
        None => path,
    }
}

/// Escaped characters with line breaks as `<br/>`.
fn text_content(node: &DesignNode) -> String {
    let characters = node.characters.as_deref().unwrap_or_default();
    escape_text(characters).replace('\n', "<br/>")
}

pub(crate) fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Attribute-safe text. Double quotes become single quotes.
pub(crate) fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "'")
}
