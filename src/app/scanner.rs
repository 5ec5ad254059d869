use crate::app::error::GenerateError;
use crate::app::formatter::quote;
use crate::app::models::{AssetBranch, AssetLeaf, AssetNode, AssetTree, ExtensionSet, IMPORT_CALL};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory waiting to be listed.
struct PendingDir {
    source: PathBuf,
    /// Directory names from the partition root down to this directory.
    keys: Vec<String>,
    /// Path of this directory as seen from the output file.
    output_path: String,
    /// Depth assigned to entries listed in this directory.
    depth: usize,
    /// Canonical paths from the root down to and including this directory.
    ancestors: Vec<PathBuf>,
}

pub struct Scanner<'a> {
    root: PathBuf,
    extensions: &'a ExtensionSet,
    path_prefix: String,
    exclude_set: GlobSet,
}

impl<'a> Scanner<'a> {
    pub fn new(
        root: PathBuf,
        extensions: &'a ExtensionSet,
        path_prefix: &str,
        exclude: &[String],
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            root,
            extensions,
            path_prefix: path_prefix.replace('\\', "/"),
            exclude_set: build_globset(exclude)?,
        })
    }

    /// Walks the root breadth-first and files every recognized asset under its extension.
    ///
    /// Subdirectories are mirrored into every partition as they are reached, so empty
    /// branches are expected here; the renderer prunes them.
    pub fn build_tree(&self) -> Result<AssetTree, GenerateError> {
        let mut tree = AssetTree::new(self.extensions);
        let root_canonical =
            fs::canonicalize(&self.root).map_err(|e| GenerateError::io(&self.root, e))?;

        let mut queue = VecDeque::new();
        queue.push_back(PendingDir {
            source: self.root.clone(),
            keys: Vec::new(),
            output_path: self.path_prefix.clone(),
            depth: 1,
            ancestors: vec![root_canonical],
        });

        while let Some(dir) = queue.pop_front() {
            for path in list_sorted(&dir.source)? {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    log::warn!("Skipping non UTF-8 name: {}", path.display());
                    continue;
                };

                if self.is_excluded(&path) {
                    log::debug!("Excluded {}", path.display());
                    continue;
                }

                // Follows symlinks.
                let metadata = fs::metadata(&path).map_err(|e| GenerateError::io(&path, e))?;
                let output_path = join_output(&dir.output_path, name);

                if metadata.is_dir() {
                    let canonical =
                        fs::canonicalize(&path).map_err(|e| GenerateError::io(&path, e))?;
                    // Only a link back into its own ancestry is a cycle.
                    if dir.ancestors.contains(&canonical) {
                        log::warn!("Skipping symlink cycle at {}", path.display());
                        continue;
                    }

                    for partition in tree.partitions_mut() {
                        if let Some(parent) = partition.descend_mut(&dir.keys) {
                            parent.insert(name, AssetNode::Branch(AssetBranch::default()));
                        }
                    }

                    let mut keys = dir.keys.clone();
                    keys.push(name.to_string());
                    let mut ancestors = dir.ancestors.clone();
                    ancestors.push(canonical);
                    queue.push_back(PendingDir {
                        source: path,
                        keys,
                        output_path,
                        depth: dir.depth + 1,
                        ancestors,
                    });
                } else if metadata.is_file() {
                    self.add_file(&mut tree, &dir, &path, output_path);
                }
            }
        }

        Ok(tree)
    }

    fn add_file(&self, tree: &mut AssetTree, dir: &PendingDir, path: &Path, output_path: String) {
        let Some(ext) = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
        else {
            return;
        };
        if !self.extensions.contains(&ext) {
            return;
        }
        let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };

        let import_path = normalize_import_path(&output_path);
        log::debug!("Found {} -> {}", path.display(), import_path);
        let leaf = AssetNode::Leaf(AssetLeaf {
            depth: dir.depth,
            import_expr: format!("{}({})", IMPORT_CALL, quote(&import_path)),
        });

        let Some(parent) = tree
            .partition_mut(&ext)
            .and_then(|partition| partition.descend_mut(&dir.keys))
        else {
            log::warn!("No branch left for {}, skipping", path.display());
            return;
        };
        if parent.insert(key, leaf).is_some() {
            log::warn!("Key \"{}\" is defined twice, keeping {}", key, path.display());
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path.strip_prefix(&self.root)
            .map(|relative| self.exclude_set.is_match(relative))
            .unwrap_or(false)
    }
}

fn list_sorted(dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| GenerateError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GenerateError::io(dir, e))?;
    // Listing order is OS dependent; sort so output is stable everywhere.
    paths.sort();
    Ok(paths)
}

fn join_output(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}

/// Makes a path usable as a relative module specifier.
pub fn normalize_import_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let is_relative =
        path == "." || path == ".." || path.starts_with("./") || path.starts_with("../");
    if is_relative {
        path.to_string()
    } else {
        format!("./{}", path)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, GenerateError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|source| GenerateError::InvalidPattern {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| GenerateError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}
