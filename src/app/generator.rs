use crate::app::error::GenerateError;
use crate::app::formatter::Renderer;
use crate::app::models::{GeneratedFile, RuntimeConfig, TargetLang};
use crate::app::scanner::Scanner;
use pathdiff::diff_paths;
use std::env;
use std::path::{Component, Path, PathBuf};

/// Scans the configured directory and renders the asset file. Nothing is written.
pub fn generate(config: &RuntimeConfig) -> Result<GeneratedFile, GenerateError> {
    let directory = &config.input_dir;
    if !directory.is_dir() {
        return Err(GenerateError::NotADirectory(directory.clone()));
    }

    let (filename, target_lang) = resolve_output(config.output.as_deref(), config.target_lang);
    let cwd = env::current_dir().map_err(GenerateError::CurrentDir)?;
    let prefix = relative_prefix(&filename, directory, &cwd);
    log::debug!(
        "Writing {:?} output to {}, assets referenced via '{}'",
        target_lang,
        filename.display(),
        prefix
    );

    let scanner = Scanner::new(directory.clone(), &config.extensions, &prefix, &config.exclude)?;
    let tree = scanner.build_tree()?;
    log::info!("Found {} assets in {}", tree.leaf_count(), directory.display());

    let body = Renderer::new(config.indent_width).render_body(&tree);
    Ok(GeneratedFile {
        filename,
        content: target_lang.wrap(&body),
    })
}

/// Picks the output path and language. A `.js`/`.ts` output suffix overrides `target_lang`.
pub fn resolve_output(
    output: Option<&Path>,
    target_lang: Option<TargetLang>,
) -> (PathBuf, TargetLang) {
    let lang = target_lang.unwrap_or_default();
    match output {
        Some(path) => {
            let from_suffix = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(TargetLang::from_suffix);
            (path.to_path_buf(), from_suffix.unwrap_or(lang))
        }
        None => (PathBuf::from(format!("assets.{}", lang.suffix())), lang),
    }
}

/// Path from the directory holding `output_file` to `input_dir`, with `/` separators.
pub fn relative_prefix(output_file: &Path, input_dir: &Path, cwd: &Path) -> String {
    let input = normalize_lexically(&cwd.join(input_dir));
    let output = normalize_lexically(&cwd.join(output_file));
    let output_dir = output.parent().unwrap_or(&output);

    match diff_paths(&input, output_dir) {
        Some(relative) => relative.to_string_lossy().replace('\\', "/"),
        None => input.to_string_lossy().replace('\\', "/"),
    }
}

/// Resolves `.` and `..` without touching the filesystem; the output may not exist yet.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
