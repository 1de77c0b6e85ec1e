//! CSS code generator.
//!
//! In stylesheet mode every element's declarations become a class rule.
//! Elements with identical declarations share one class.

use std::collections::HashMap;

use crate::style::StyleMap;

/// Class prefix for generated rules.
pub const CLASS_PREFIX: &str = "fg-";

/// Rules collected during one conversion.
#[derive(Debug, Default)]
pub struct Stylesheet {
    rules: Vec<(String, StyleMap)>,
    by_declarations: HashMap<String, String>,
    next_id: usize,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class name for `styles`, creating a rule on first use.
    pub fn class_for(&mut self, styles: &StyleMap) -> String {
        let key = styles.to_declarations();
        if let Some(class) = self.by_declarations.get(&key) {
            return class.clone();
        }

        let class = format!("{CLASS_PREFIX}{}", self.next_id);
        self.next_id += 1;
        self.by_declarations.insert(key, class.clone());
        self.rules.push((class.clone(), styles.clone()));
        class
    }

    /// Add a rule under a fixed class name.
    pub fn add_rule(&mut self, class: &str, styles: &StyleMap) {
        self.rules.push((class.to_string(), styles.clone()));
    }

    /// Render all rules in insertion order.
    pub fn generate(&self) -> String {
        let mut css = String::new();
        for (class, styles) in &self.rules {
            css.push_str(&format!(".{class} {{\n"));
            for (property, value) in styles.iter() {
                css.push_str(&format!("  {property}: {value};\n"));
            }
            css.push_str("}\n");
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styles(pairs: &[(&'static str, &str)]) -> StyleMap {
        let mut s = StyleMap::new();
        for (p, v) in pairs {
            s.set(p, *v);
        }
        s
    }

    #[test]
    fn test_empty_stylesheet() {
        let sheet = Stylesheet::new();
        assert_eq!(sheet.generate(), "");
    }

    #[test]
    fn test_class_numbering() {
        let mut sheet = Stylesheet::new();
        assert_eq!(sheet.class_for(&styles(&[("width", "1px")])), "fg-0");
        assert_eq!(sheet.class_for(&styles(&[("width", "2px")])), "fg-1");
    }

    #[test]
    fn test_identical_declarations_share_class() {
        let mut sheet = Stylesheet::new();
        let a = sheet.class_for(&styles(&[("width", "1px"), ("height", "1px")]));
        let b = sheet.class_for(&styles(&[("width", "1px"), ("height", "1px")]));
        assert_eq!(a, b);
        assert_eq!(sheet.generate().matches(".fg-").count(), 1);
    }

    #[test]
    fn test_generate_rules() {
        let mut sheet = Stylesheet::new();
        sheet.add_rule("figma-root", &styles(&[("position", "relative")]));
        sheet.class_for(&styles(&[("display", "flex"), ("gap", "8px")]));
        assert_eq!(
            sheet.generate(),
            ".figma-root {\n  position: relative;\n}\n.fg-0 {\n  display: flex;\n  gap: 8px;\n}\n"
        );
    }
}
