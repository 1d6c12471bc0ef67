use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    net::{AddrParseError, SocketAddr},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    ext::{AsyncTryFrom, BestEffortPathExt},
    icons::{DEFAULT_ICON_BASE_URL, IconTable},
    theme::Theme,
};

const CONFIG_FILE_NAME: &str = "boron.yaml";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings read from `boron.yaml`. Every section is optional.
///
/// ```yaml
/// server:
///   bind: "0.0.0.0:8080"
/// theme:
///   background: "#15232d"
///   foreground: "#cdcdcd"
///   lines: "#cdcdcd"
/// icons:
///   base_url: "https://example.com/icons/"
///   files:
///     proto: "file_type_protobuf.svg"
///   folders:
///     migrations: "folder_type_db_opened.svg"
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub theme: Theme,
    pub icons: IconTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            theme: Theme::default(),
            icons: IconTable::default(),
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl AppConfig {
    /// Loads the explicitly requested file, or `boron.yaml` under `root` when
    /// it exists. Only an explicit file is required to be present.
    pub async fn load(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::async_try_from(path).await;
        }

        let path = get_config_file_path(root);
        if !path.exists() {
            info!(
                "No config file at {}, using defaults",
                path.best_effort_path_display()
            );
            return Ok(Self::default());
        }
        Self::async_try_from(path.as_path()).await
    }

    fn parse_theme(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Theme, ConfigError> {
        let Some(theme) = section(top_level, "theme")? else {
            return Ok(Theme::default());
        };
        Ok(Theme::from_fields(
            string(theme, "background"),
            string(theme, "foreground"),
            string(theme, "lines"),
            &Theme::default(),
        ))
    }

    fn parse_bind(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<SocketAddr, ConfigError> {
        match section(top_level, "server")?.and_then(|server| string(server, "bind")) {
            Some(bind) => bind.parse().context(InvalidBindAddressSnafu { value: bind }),
            None => Ok(default_bind_address()),
        }
    }

    fn parse_icons(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<IconTable, ConfigError> {
        let Some(icons) = section(top_level, "icons")? else {
            return Ok(IconTable::default());
        };

        let base_url = string(icons, "base_url").unwrap_or(DEFAULT_ICON_BASE_URL);
        let table = string_pairs(section(icons, "files")?)
            .fold(IconTable::new(base_url), |table, (key, icon)| {
                debug!("Icon override for file '{}': {}", key, icon);
                table.with_file_override(key, icon)
            });
        let table = string_pairs(section(icons, "folders")?).fold(table, |table, (name, icon)| {
            debug!("Icon override for folder '{}': {}", name, icon);
            table.with_folder_override(name, icon)
        });
        Ok(table)
    }
}

impl<'a> AsyncTryFrom<&'a Path> for AppConfig {
    type Error = ConfigError;

    async fn async_try_from(path: &'a Path) -> Result<Self, Self::Error> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = compio::fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8_lossy(&bytes);
        Self::try_from(&*contents)
    }
}

impl TryFrom<&str> for AppConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if let Yaml::Value(Scalar::Null) = document {
            return Ok(Self::default());
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        Ok(AppConfig {
            bind: Self::parse_bind(top_level)?,
            theme: Self::parse_theme(top_level)?,
            icons: Self::parse_icons(top_level)?,
        })
    }
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Looks up a nested mapping. An empty (`null`) section counts as absent.
fn section<'a, 'y>(
    map: &'a LinkedHashMap<Yaml<'y>, Yaml<'y>>,
    name: &'static str,
) -> Result<Option<&'a LinkedHashMap<Yaml<'y>, Yaml<'y>>>, ConfigError> {
    match map.get(&key(name)) {
        None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
        Some(value) => value
            .as_mapping()
            .map(Some)
            .context(SectionNotMapSnafu { section: name }),
    }
}

fn string<'a, 'y>(map: &'a LinkedHashMap<Yaml<'y>, Yaml<'y>>, name: &'static str) -> Option<&'a str> {
    let value = map.get(&key(name))?;
    let text = value.as_str();
    if text.is_none() {
        warn!("Ignoring non-string value for '{}'", name);
    }
    text
}

fn string_pairs<'a, 'y>(
    map: Option<&'a LinkedHashMap<Yaml<'y>, Yaml<'y>>>,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    map.into_iter().flat_map(|map| map.iter()).filter_map(|(key, value)| {
        let pair = key.as_str().zip(value.as_str());
        if pair.is_none() {
            debug!("Skipping invalid icon entry: {:?}", key);
        }
        pair
    })
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Section '{}' should be a map", section))]
    SectionNotMap { section: String },
    #[snafu(display("Invalid bind address '{}'", value))]
    InvalidBindAddress {
        value: String,
        source: AddrParseError,
    },
}
