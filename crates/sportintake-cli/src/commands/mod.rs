//! Subcommands and the pieces they share.

pub mod batch;
pub mod config;
pub mod output;
pub mod parse;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use sportintake_core::{
    parse_offline, DocumentKind, Extraction, HeuristicParser, HttpExtractor, IntakeConfig,
    IntakeParser, ParseError, ParsedRecord,
};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sportintake")
        .join("config.json")
}

/// The `-c` path if given, else the default location.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicit `-c` path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IntakeConfig> {
    if let Some(path) = config_path {
        return Ok(IntakeConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(IntakeConfig::from_file(&path)?)
    } else {
        Ok(IntakeConfig::default())
    }
}

/// Document kind selection on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    /// Detect from the document heading
    Auto,
    /// Sport indication
    Indication,
    /// Sport mutation notice
    Mutation,
}

impl KindArg {
    pub fn resolve(self, text: &str) -> DocumentKind {
        match self {
            KindArg::Auto => DocumentKind::detect(text),
            KindArg::Indication => DocumentKind::Indication,
            KindArg::Mutation => DocumentKind::Mutation,
        }
    }
}

/// The parsing pipeline selected by configuration and `--offline`.
pub enum Pipeline {
    Offline(HeuristicParser),
    Remote(IntakeParser<HttpExtractor>),
}

impl Pipeline {
    pub fn new(config: &IntakeConfig, offline: bool) -> Self {
        if offline || !config.remote.enabled {
            Pipeline::Offline(HeuristicParser::new(config.extraction.clone()))
        } else {
            Pipeline::Remote(IntakeParser::from_config(config))
        }
    }

    pub async fn parse(
        &self,
        kind: DocumentKind,
        text: &str,
    ) -> Result<Extraction<ParsedRecord>, ParseError> {
        match self {
            Pipeline::Offline(parser) => parse_offline(parser, kind, text),
            Pipeline::Remote(parser) => parser.parse(kind, text).await,
        }
    }
}

/// Short label for the path that produced a record.
pub fn path_label<T>(extraction: &Extraction<T>) -> &'static str {
    match extraction {
        Extraction::Ai(_) => "ai",
        Extraction::Fallback { .. } => "heuristic",
    }
}
