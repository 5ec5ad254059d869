use crate::app::cli::Cli;
use crate::app::models::{ExtensionSet, RuntimeConfig, TargetLang};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Indentation used when neither the CLI nor a preset sets one.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PresetConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub target_lang: Option<TargetLang>,
    pub indents: Option<usize>,
    pub include_ext: Option<Vec<String>>,
    pub exclude_ext: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

fn default_presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("require_assets")
        .join("presets.toml"))
}

/// Loads presets from `explicit`, or from the default location when it exists.
pub fn load_presets_file(explicit: Option<&Path>) -> Result<HashMap<String, PresetConfig>> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_presets_path()?;
            if !path.exists() {
                return Ok(HashMap::new());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;
    parse_presets(&content).context(format!("Failed to parse {:?}", config_path))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

/// Preset entries first, then CLI entries, first occurrence kept.
fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

pub fn resolve_config(cli: Cli, project_name: Option<&str>) -> Result<RuntimeConfig> {
    let presets = load_presets_file(cli.config.as_deref())?;
    resolve_with_presets(cli, project_name, &presets)
}

/// CLI scalars beat preset scalars; lists are merged.
pub fn resolve_with_presets(
    cli: Cli,
    project_name: Option<&str>,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    // CLI flag > project directory name > none
    let preset = match cli.preset.as_deref() {
        Some(name) => presets
            .get(name)
            .cloned()
            .with_context(|| format!("Unknown preset '{}'", name))?,
        None => project_name
            .and_then(|name| presets.get(name))
            .cloned()
            .unwrap_or_default(),
    };

    let Some(input_dir) = cli.directory.or(cli.input).or(preset.input) else {
        bail!("No directory given.");
    };

    let include_ext = merge_vecs(preset.include_ext, cli.include_ext);
    let exclude_ext = merge_vecs(preset.exclude_ext, cli.exclude_ext);
    let extensions = ExtensionSet::resolve(&include_ext, &exclude_ext);
    if extensions.is_empty() {
        log::warn!("No file extensions left to scan; output will be empty.");
    }

    Ok(RuntimeConfig {
        input_dir,
        extensions,
        exclude: merge_vecs(preset.exclude, cli.exclude),
        target_lang: cli.target_lang.or(preset.target_lang),
        output: cli.output.or(preset.output),
        indent_width: cli
            .indents
            .or(preset.indents)
            .unwrap_or(DEFAULT_INDENT_WIDTH),
        to_stdout: cli.stdout,
    })
}
