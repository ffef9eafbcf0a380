use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use blokus::{Catalog, PlayerColor, PIECES};
use clap::ValueEnum;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8887";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorArg {
    Orange,
    Blue,
}

impl From<ColorArg> for PlayerColor {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Orange => PlayerColor::First,
            ColorArg::Blue => PlayerColor::Second,
        }
    }
}

/// Defaults read from a JSON file. Command line flags take precedence.
///
/// ```json
/// { "server_url": "ws://localhost:8887", "color": "blue", "pieces": "pieces.txt" }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    pub color: Option<ColorArg>,
    /// A piece notation file replacing the standard pieces.
    pub pieces: Option<PathBuf>,
}

impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Could not parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Everything needed to start playing.
#[derive(Debug)]
pub struct Settings {
    pub server_url: Url,
    pub color: PlayerColor,
    pub catalog: Catalog,
}

impl Settings {
    /// Combines flags and config file, flags first.
    pub fn resolve(
        server_url: Option<String>,
        color: Option<ColorArg>,
        pieces: Option<PathBuf>,
        config: ClientConfig,
    ) -> anyhow::Result<Self> {
        let server_url = server_url
            .or(config.server_url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned());
        let server_url = parse_server_url(&server_url)?;
        let color = color.or(config.color).unwrap_or(ColorArg::Orange).into();
        let catalog = match pieces.or(config.pieces) {
            Some(path) => load_catalog(&path)?,
            None => PIECES.clone(),
        };
        Ok(Self {
            server_url,
            color,
            catalog,
        })
    }
}

pub fn parse_server_url(text: &str) -> anyhow::Result<Url> {
    let url = Url::parse(text).with_context(|| format!("Invalid server URL {:?}", text))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        bail!("Server URL must use ws:// or wss://, got {}", url);
    }
    Ok(url)
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read piece file {}", path.display()))?;
    let catalog = Catalog::parse(&text)
        .with_context(|| format!("Invalid piece file {}", path.display()))?;
    if catalog.is_empty() {
        bail!("Piece file {} defines no pieces", path.display());
    }
    Ok(catalog)
}
