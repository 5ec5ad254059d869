use crate::app::models::TargetLang;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a JS/TS module that requires every asset in a directory",
    after_help = "By default, the following extensions are included: jpg, jpeg, png, gif."
)]
pub struct Cli {
    /// Directory to convert into an asset file
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Same as DIR
    #[arg(short, long, value_name = "DIR", conflicts_with = "directory")]
    pub input: Option<PathBuf>,

    /// Output path of the generated file (default: assets.<lang>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target language; a .js/.ts suffix on --output takes precedence
    #[arg(short, long, value_enum, alias = "targetLang")]
    pub target_lang: Option<TargetLang>,

    /// Number of spaces per indentation level
    #[arg(long, value_name = "N")]
    pub indents: Option<usize>,

    /// Extra file extensions to collect (e.g., 'svg webp')
    #[arg(long, num_args = 1.., value_name = "EXT", alias = "includeExt")]
    pub include_ext: Option<Vec<String>>,

    /// File extensions to ignore, defaults included
    #[arg(long, num_args = 1.., value_name = "EXT", alias = "excludeExt")]
    pub exclude_ext: Option<Vec<String>>,

    /// Glob patterns, relative to DIR, for files or directories to skip
    #[arg(long, num_args = 1.., value_name = "GLOB")]
    pub exclude: Option<Vec<String>>,

    /// Use a named preset from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Presets file to use instead of ~/.config/require_assets/presets.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_directory() {
        let cli = Cli::parse_from(["require_assets", "src/test/assets"]);
        assert_eq!(cli.directory, Some(PathBuf::from("src/test/assets")));
        assert_eq!(cli.input, None);
        assert!(!cli.stdout);
    }

    #[test]
    fn parses_camel_case_aliases() {
        let cli = Cli::parse_from([
            "require_assets",
            "-i",
            "img",
            "--targetLang",
            "ts",
            "--includeExt",
            "svg",
            "webp",
            "--excludeExt",
            "gif",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("img")));
        assert_eq!(cli.target_lang, Some(TargetLang::Ts));
        assert_eq!(cli.include_ext, Some(vec!["svg".to_string(), "webp".to_string()]));
        assert_eq!(cli.exclude_ext, Some(vec!["gif".to_string()]));
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(Cli::try_parse_from(["require_assets", "img", "-t", "py"]).is_err());
    }

    #[test]
    fn rejects_non_integer_indents() {
        assert!(Cli::try_parse_from(["require_assets", "img", "--indents", "two"]).is_err());
        assert!(Cli::try_parse_from(["require_assets", "img", "--indents", "-1"]).is_err());
    }

    #[test]
    fn directory_and_input_conflict() {
        assert!(Cli::try_parse_from(["require_assets", "a", "--input", "b"]).is_err());
    }
}
