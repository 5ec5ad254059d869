use serde::Deserialize;
use std::path::PathBuf;

/// Extensions recognized when no `--include-ext` / `--exclude-ext` is given.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Call emitted around every asset path.
pub const IMPORT_CALL: &str = "require";

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub input_dir: PathBuf,
    pub extensions: ExtensionSet,
    pub exclude: Vec<String>,
    pub target_lang: Option<TargetLang>,
    pub output: Option<PathBuf>,
    pub indent_width: usize,
    pub to_stdout: bool,
}

/// Syntax of the export statement wrapping the rendered object.
#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLang {
    /// CommonJS: `module.asset = {...};`
    #[default]
    Js,
    /// ES module: `export const asset = {...};`
    Ts,
}

impl TargetLang {
    pub fn suffix(self) -> &'static str {
        match self {
            TargetLang::Js => "js",
            TargetLang::Ts => "ts",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        if suffix.eq_ignore_ascii_case("js") {
            Some(TargetLang::Js)
        } else if suffix.eq_ignore_ascii_case("ts") {
            Some(TargetLang::Ts)
        } else {
            None
        }
    }

    fn export_prefix(self) -> &'static str {
        match self {
            TargetLang::Js => "module.asset = ",
            TargetLang::Ts => "export const asset = ",
        }
    }

    /// Wraps a rendered object literal into a complete source file.
    pub fn wrap(self, body: &str) -> String {
        format!("{}{};\n", self.export_prefix(), body)
    }
}

/// Lowercase, dot-prefixed extensions in the order they were first named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    /// Defaults plus `include`, minus `exclude`. Inputs may carry a leading dot and any case.
    pub fn resolve(include: &[String], exclude: &[String]) -> Self {
        let mut extensions: Vec<String> = Vec::new();
        let candidates = DEFAULT_EXTENSIONS
            .iter()
            .copied()
            .chain(include.iter().map(String::as_str));
        for candidate in candidates {
            if let Some(ext) = normalize_extension(candidate) {
                if !extensions.contains(&ext) {
                    extensions.push(ext);
                }
            }
        }

        let excluded: Vec<String> = exclude.iter().filter_map(|e| normalize_extension(e)).collect();
        extensions.retain(|ext| !excluded.contains(ext));

        Self(extensions)
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.0.iter().any(|e| e == ext)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::resolve(&[], &[])
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// A discovered asset: its nesting depth and the import expression pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLeaf {
    pub depth: usize,
    pub import_expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetNode {
    Leaf(AssetLeaf),
    Branch(AssetBranch),
}

/// Ordered mapping of keys to nodes. Keys keep their first insertion position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBranch {
    children: Vec<(String, AssetNode)>,
}

impl AssetBranch {
    /// Inserts `node` under `key`, returning the node it replaced.
    pub fn insert(&mut self, key: &str, node: AssetNode) -> Option<AssetNode> {
        match self.children.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, node)),
            None => {
                self.children.push((key.to_string(), node));
                None
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&AssetNode> {
        self.children.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    /// Follows `keys` through nested branches. `None` if a key is missing or names a leaf.
    pub fn descend_mut(&mut self, keys: &[String]) -> Option<&mut AssetBranch> {
        let mut current = self;
        for key in keys {
            current = match current.children.iter_mut().find(|(k, _)| k == key) {
                Some((_, AssetNode::Branch(branch))) => branch,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &AssetNode)> {
        self.children.iter().map(|(k, n)| (k.as_str(), n))
    }

    /// Number of leaves anywhere beneath this branch.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|(_, node)| match node {
                AssetNode::Leaf(_) => 1,
                AssetNode::Branch(branch) => branch.leaf_count(),
            })
            .sum()
    }

    #[cfg(test)]
    fn collect_leaves<'a>(
        &'a self,
        prefix: &mut Vec<&'a str>,
        out: &mut Vec<(Vec<String>, &'a AssetLeaf)>,
    ) {
        for (key, node) in &self.children {
            prefix.push(key.as_str());
            match node {
                AssetNode::Leaf(leaf) => {
                    out.push((prefix.iter().map(|s| s.to_string()).collect(), leaf))
                }
                AssetNode::Branch(branch) => branch.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }
}

/// One branch per recognized extension, each mirroring the directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTree {
    partitions: Vec<(String, AssetBranch)>,
}

impl AssetTree {
    pub fn new(extensions: &ExtensionSet) -> Self {
        Self {
            partitions: extensions
                .iter()
                .map(|ext| (ext.to_string(), AssetBranch::default()))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn partition(&self, ext: &str) -> Option<&AssetBranch> {
        self.partitions.iter().find(|(e, _)| e == ext).map(|(_, b)| b)
    }

    pub fn partition_mut(&mut self, ext: &str) -> Option<&mut AssetBranch> {
        self.partitions
            .iter_mut()
            .find(|(e, _)| e == ext)
            .map(|(_, b)| b)
    }

    pub fn partitions(&self) -> impl Iterator<Item = (&str, &AssetBranch)> {
        self.partitions.iter().map(|(e, b)| (e.as_str(), b))
    }

    pub fn partitions_mut(&mut self) -> impl Iterator<Item = &mut AssetBranch> {
        self.partitions.iter_mut().map(|(_, b)| b)
    }

    pub fn leaf_count(&self) -> usize {
        self.partitions.iter().map(|(_, b)| b.leaf_count()).sum()
    }

    /// Every leaf as `(extension, key path, import expression)`.
    #[cfg(test)]
    pub fn leaves(&self) -> Vec<(String, Vec<String>, String)> {
        let mut out = Vec::new();
        for (ext, branch) in &self.partitions {
            let mut found = Vec::new();
            branch.collect_leaves(&mut Vec::new(), &mut found);
            out.extend(
                found
                    .into_iter()
                    .map(|(keys, leaf)| (ext.clone(), keys, leaf.import_expr.clone())),
            );
        }
        out
    }
}

/// Output of a generation run, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub filename: PathBuf,
    pub content: String,
}
