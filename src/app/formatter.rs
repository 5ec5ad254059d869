use crate::app::models::{AssetBranch, AssetNode, AssetTree};

/// Serializes an asset tree into an object literal, dropping branches without leaves.
pub struct Renderer {
    indent_width: usize,
}

impl Renderer {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// Renders the whole tree as `{ ext: {...}, ... }`, or `{}` when nothing survives pruning.
    pub fn render_body(&self, tree: &AssetTree) -> String {
        let mut lines = Vec::new();

        for (ext, branch) in tree.partitions() {
            let inner = self.render_children(branch, 1);
            if inner.is_empty() {
                continue;
            }
            let name = ext.trim_start_matches('.');
            lines.push(format!("{}{}: {{", self.indent(1), object_key(name)));
            lines.extend(inner);
            lines.push(format!("{}}},", self.indent(1)));
        }

        if lines.is_empty() {
            "{}".to_string()
        } else {
            format!("{{\n{}\n}}", lines.join("\n"))
        }
    }

    /// Lines for the children of `branch`, whose entries sit at `depth`.
    fn render_children(&self, branch: &AssetBranch, depth: usize) -> Vec<String> {
        let mut lines = Vec::new();

        for (key, node) in branch.entries() {
            match node {
                AssetNode::Leaf(leaf) => {
                    // Leaves carry their own depth from the walk.
                    lines.push(format!(
                        "{}{}: {},",
                        self.indent(leaf.depth + 1),
                        quote(key),
                        leaf.import_expr
                    ));
                }
                AssetNode::Branch(child) => {
                    let inner = self.render_children(child, depth + 1);
                    if inner.is_empty() {
                        continue;
                    }
                    lines.push(format!("{}{}: {{", self.indent(depth + 1), quote(key)));
                    lines.extend(inner);
                    lines.push(format!("{}}},", self.indent(depth + 1)));
                }
            }
        }

        lines
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_width)
    }
}

/// Bare identifier when possible; names like `7z` are quoted on purpose so the output still parses.
fn object_key(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Double-quoted string literal valid in both JavaScript and TypeScript.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{AssetLeaf, ExtensionSet};

    fn leaf(depth: usize, path: &str) -> AssetNode {
        AssetNode::Leaf(AssetLeaf {
            depth,
            import_expr: format!("require(\"{}\")", path),
        })
    }

    fn branch(entries: Vec<(&str, AssetNode)>) -> AssetNode {
        let mut b = AssetBranch::default();
        for (key, node) in entries {
            b.insert(key, node);
        }
        AssetNode::Branch(b)
    }

    fn tree_with(ext_entries: Vec<(&str, Vec<(&str, AssetNode)>)>) -> AssetTree {
        let include: Vec<String> = ext_entries.iter().map(|(e, _)| e.to_string()).collect();
        let mut tree = AssetTree::new(&ExtensionSet::resolve(&include, &[]));
        for (ext, entries) in ext_entries {
            let partition = tree.partition_mut(&format!(".{}", ext)).unwrap();
            for (key, node) in entries {
                partition.insert(key, node);
            }
        }
        tree
    }

    /// Reads `(extension, key path, expression)` triples back out of rendered text.
    fn parse_leaves(text: &str) -> Vec<(String, Vec<String>, String)> {
        let mut stack: Vec<String> = Vec::new();
        let mut found = Vec::new();
        for line in text.lines() {
            let t = line.trim();
            if let Some(key) = t.strip_suffix(": {") {
                stack.push(key.trim_matches('"').to_string());
            } else if t == "}," {
                stack.pop();
            } else if let Some((key, expr)) = t.split_once(": ") {
                let mut keys: Vec<String> = stack[1..].to_vec();
                keys.push(key.trim_matches('"').to_string());
                found.push((
                    format!(".{}", stack[0]),
                    keys,
                    expr.trim_end_matches(',').to_string(),
                ));
            }
        }
        found
    }

    #[test]
    fn empty_tree_renders_empty_object() {
        let tree = AssetTree::new(&ExtensionSet::default());
        assert_eq!(Renderer::new(2).render_body(&tree), "{}");
    }

    #[test]
    fn empty_nested_branches_are_pruned() {
        let tree = tree_with(vec![
            ("png", vec![("cold", branch(vec![("bold", branch(vec![]))]))]),
            ("jpg", vec![("hello", leaf(1, "./src/hello.jpg"))]),
        ]);

        let body = Renderer::new(2).render_body(&tree);
        assert_eq!(
            body,
            "{\n  jpg: {\n    \"hello\": require(\"./src/hello.jpg\"),\n  },\n}"
        );
        assert!(!body.contains("cold"));
        assert!(!body.contains("bold"));
        assert!(!body.contains("png"));
    }

    #[test]
    fn renders_nested_directories() {
        let tree = tree_with(vec![(
            "jpg",
            vec![
                ("moon", leaf(1, "./assets/moon.jpg")),
                ("nested", branch(vec![("moon", leaf(2, "./assets/nested/moon.jpg"))])),
                ("sun", leaf(1, "./assets/sun.jpg")),
            ],
        )]);

        let expected = [
            "{",
            "  jpg: {",
            "    \"moon\": require(\"./assets/moon.jpg\"),",
            "    \"nested\": {",
            "      \"moon\": require(\"./assets/nested/moon.jpg\"),",
            "    },",
            "    \"sun\": require(\"./assets/sun.jpg\"),",
            "  },",
            "}",
        ]
        .join("\n");
        assert_eq!(Renderer::new(2).render_body(&tree), expected);
    }

    #[test]
    fn indent_width_scales_every_level() {
        let tree = tree_with(vec![(
            "gif",
            vec![("a", branch(vec![("b", leaf(2, "./a/b.gif"))]))],
        )]);

        let four = Renderer::new(4).render_body(&tree);
        assert!(four.contains("\n            \"b\": require"));

        let zero = Renderer::new(0).render_body(&tree);
        assert_eq!(zero, "{\ngif: {\n\"a\": {\n\"b\": require(\"./a/b.gif\"),\n},\n},\n}");
    }

    #[test]
    fn leaf_indent_follows_recorded_depth() {
        let tree = tree_with(vec![("png", vec![("deep", leaf(3, "./x.png"))])]);
        let body = Renderer::new(1).render_body(&tree);
        assert!(body.contains("\n    \"deep\": require(\"./x.png\"),"));
    }

    #[test]
    fn keys_are_quoted_and_escaped() {
        let tree = tree_with(vec![
            ("png", vec![("my \"logo\".v2", leaf(1, "./a.png"))]),
            ("7z", vec![("archive", leaf(1, "./archive.7z"))]),
        ]);
        let body = Renderer::new(2).render_body(&tree);
        assert!(body.contains(r#""my \"logo\".v2": require("./a.png"),"#));
        assert!(body.contains(r#"  "7z": {"#));
    }

    #[test]
    fn rendering_preserves_every_leaf() {
        let tree = tree_with(vec![
            (
                "jpg",
                vec![
                    ("moon", leaf(1, "./moon.jpg")),
                    (
                        "nested",
                        branch(vec![
                            ("moon", leaf(2, "./nested/moon.jpg")),
                            ("deeper", branch(vec![("sun", leaf(3, "./nested/deeper/sun.jpg"))])),
                            ("empty", branch(vec![])),
                        ]),
                    ),
                ],
            ),
            ("png", vec![("earth", leaf(1, "./earth.png"))]),
        ]);

        let mut parsed = parse_leaves(&Renderer::new(2).render_body(&tree));
        let mut expected = tree.leaves();
        parsed.sort();
        expected.sort();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
        assert_eq!(quote("tab\there"), r#""tab\there""#);
    }
}
