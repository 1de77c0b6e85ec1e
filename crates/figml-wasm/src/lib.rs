//! WASM bindings for the figml converter.
//!
//! Exposes `convert()` to JavaScript via wasm-bindgen.
//! Returns a JS object `{ html, css }` or throws on error.

use figml_codegen::{CompilerOutput, ConvertOptions, StyleMode};
use wasm_bindgen::prelude::*;

/// Convert a design API response (JSON text) to HTML.
///
/// `node_id` selects a sub-tree (`1:2`, `1-2` or `1%3A2`); without it the
/// first page is rendered. With `stylesheet` set, elements carry classes and
/// the rules come back in `css`.
#[wasm_bindgen]
pub fn convert(json: &str, node_id: Option<String>, stylesheet: bool) -> Result<JsValue, JsError> {
    let output = run(json, node_id.as_deref(), stylesheet).map_err(|e| JsError::new(&e))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"html".into(), &output.html.into())
        .map_err(|_| JsError::new("Failed to set html property"))?;
    js_sys::Reflect::set(&js_obj, &"css".into(), &output.css.into())
        .map_err(|_| JsError::new("Failed to set css property"))?;

    Ok(js_obj.into())
}

/// Get the converter version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn run(json: &str, node_id: Option<&str>, stylesheet: bool) -> Result<CompilerOutput, String> {
    let response = figml_model::parse_response(json).map_err(|e| e.to_string())?;
    let options = ConvertOptions {
        style_mode: if stylesheet {
            StyleMode::Stylesheet
        } else {
            StyleMode::Inline
        },
        ..Default::default()
    };
    figml_codegen::compile(&response, node_id, &options).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FILE: &str = r#"{
        "document": {
            "id": "0:0",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "type": "CANVAS",
                "name": "Page 1",
                "children": [{
                    "id": "4:2",
                    "type": "TEXT",
                    "characters": "Hello",
                    "absoluteBoundingBox": { "x": 10, "y": 20, "width": 100, "height": 24 }
                }]
            }]
        }
    }"#;

    // =========================================================================
    // Native tests (non-WASM), same pipeline as convert()
    // =========================================================================

    #[test]
    fn test_inline_output() {
        let output = run(FILE, None, false).unwrap();
        assert!(output.html.starts_with("<div class=\"figma-root\""));
        assert!(output.html.contains(">Hello</p>"));
        assert_eq!(output.css, "");
    }

    #[test]
    fn test_stylesheet_output() {
        let output = run(FILE, None, true).unwrap();
        assert!(output.html.contains("<p class=\"fg-0\">Hello</p>"));
        assert!(output.css.contains(".figma-root {"));
        assert!(output.css.contains(".fg-0 {"));
        assert!(!output.html.contains("style=\""));
    }

    #[test]
    fn test_dashed_node_id() {
        let output = run(FILE, Some("4-2"), false).unwrap();
        assert!(output.html.starts_with("<div class=\"figma-root\""));
        assert!(!output.html.contains("Hello"));
    }

    #[test]
    fn test_missing_node() {
        let err = run(FILE, Some("9:9"), false).unwrap_err();
        assert_eq!(err, "Node '9:9' not found in the design response");
    }

    #[test]
    fn test_invalid_json() {
        let err = run("{ not json", None, false).unwrap_err();
        assert!(err.starts_with("Parse error at line 1"), "{err}");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_multiple_converts() {
        // Class numbering must restart for every conversion
        let first = run(FILE, None, true).unwrap();
        let second = run(FILE, None, true).unwrap();
        assert_eq!(first, second);
    }
}
