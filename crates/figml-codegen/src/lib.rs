//! figml Code Generator
//!
//! Transpiles a design tree into HTML, with styles either inline or collected
//! into a stylesheet. The walk is a single depth-first pass: each node is
//! classified, styled from its parent's layout mode, and emitted.
//!
//! ```text
//! SourceResponse → select_root() → compile_root() → CompilerOutput { html, css, assets }
//! ```

pub mod asset;
pub mod classify;
pub mod css;
pub mod html;
pub mod root;
pub mod style;

use std::collections::HashMap;

use figml_model::{DesignNode, SourceResponse};

pub use asset::{AssetKind, AssetManifest, AssetRef};
pub use classify::{classify, NodeKind};
pub use html::emit;
pub use root::select_root;
pub use style::{map_align, rgba, CoordinateSpace, StyleMap};

/// The compiled output for one design tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOutput {
    pub html: String,
    /// Empty unless [`StyleMode::Stylesheet`] was requested.
    pub css: String,
    /// Image and icon references in emission order.
    pub assets: Vec<AssetRef>,
}

/// Code generation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodegenError {
    #[error("Node '{id}' not found in the design response")]
    NotFound { id: String },

    #[error("Design document has no page to render")]
    EmptyDocument,
}

/// Where element styles end up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StyleMode {
    /// `style="…"` on every element.
    #[default]
    Inline,
    /// `class="fg-N"` on every element, rules in [`CompilerOutput::css`].
    Stylesheet,
}

/// Conversion switches.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub style_mode: StyleMode,
    pub coordinates: CoordinateSpace,
    /// Resolved image URLs keyed by node id. A hit replaces the relative
    /// asset path in `src`.
    pub asset_urls: HashMap<String, String>,
}

/// Shared state for one conversion. Created per call, never reused.
#[derive(Default)]
pub struct CompilationContext {
    pub options: ConvertOptions,
    pub assets: AssetManifest,
    pub stylesheet: css::Stylesheet,
}

impl CompilationContext {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

/// Select the root named by `node_id` (or the first page) and compile it.
pub fn compile(
    response: &SourceResponse,
    node_id: Option<&str>,
    options: &ConvertOptions,
) -> Result<CompilerOutput, CodegenError> {
    let root = select_root(response, node_id)?;
    Ok(compile_root(root, options))
}

/// Compile an already selected root node.
pub fn compile_root(root: &DesignNode, options: &ConvertOptions) -> CompilerOutput {
    let mut ctx = CompilationContext::new(options.clone());
    let html = html::generate(root, &mut ctx);
    let css = ctx.stylesheet.generate();

    for path in ctx.assets.collisions() {
        log::warn!("several nodes share the asset path {path}");
    }

    CompilerOutput {
        html,
        css,
        assets: ctx.assets.into_entries(),
    }
}

/// Wrap compiled output into a standalone HTML document.
pub fn to_html_page(output: &CompilerOutput, title: &str) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n");
    page.push_str(&format!("  <title>{}</title>\n", html::escape_text(title)));
    if !output.css.is_empty() {
        page.push_str(&format!("  <style>\n{}  </style>\n", output.css));
    }
    page.push_str("</head>\n<body>\n");
    page.push_str(&output.html);
    page.push_str("</body>\n</html>\n");
    page
}

/// Format a number the way a CSS author would write it: no trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
