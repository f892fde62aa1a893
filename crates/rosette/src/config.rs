use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rosette_core::MenuConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub menus: Vec<MenuConfig>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.menus
            .iter()
            .enumerate()
            .try_for_each(|(index, menu)| {
                menu.validate()
                    .map_err(|source| ConfigError::Menu { index, source })
            })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Menu {index}: {source}")]
    Menu {
        index: usize,
        source: rosette_core::ConfigError,
    },
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Icons referenced by the built-in menus, written next to the config file.
const DEFAULT_ASSETS: &[(&str, &str)] = &[
    ("assets/home.svg", include_str!("../assets/home.svg")),
    ("assets/search.svg", include_str!("../assets/search.svg")),
    ("assets/user.svg", include_str!("../assets/user.svg")),
    ("assets/edit.svg", include_str!("../assets/edit.svg")),
    ("assets/share.svg", include_str!("../assets/share.svg")),
    ("assets/settings.svg", include_str!("../assets/settings.svg")),
];

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "rosette", "rosette").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(true))
        .add_source(config::Environment::with_prefix("ROSETTE"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// The demo configuration shipped with the binary.
pub fn builtin_config() -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

fn builtin_or_empty() -> Config {
    builtin_config().unwrap_or_else(|e| {
        log::error!("Built-in configuration is invalid: {}", e);
        Config::default()
    })
}

pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        log::info!(
            "No configuration at {}, using the built-in menus",
            path.display()
        );
        return builtin_or_empty();
    }

    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            builtin_or_empty()
        }
    }
}

/// Writes the built-in config and its icons unless they already exist.
pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs_err::create_dir_all(dir.join("assets"))?;

    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    for (name, contents) in DEFAULT_ASSETS {
        let asset = dir.join(name);
        if !asset.exists() {
            fs_err::write(asset, contents)?;
        }
    }
    Ok(())
}

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosette_core::ItemDisplay;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rosette-test-{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs_err::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_builtin_config() {
        let config = builtin_config().unwrap();
        assert_eq!(config.menus.len(), 2);

        let emoji = &config.menus[0];
        assert_eq!(emoji.selector.as_ref().unwrap().to_string(), ".header");
        assert_eq!(emoji.items.len(), 6);
        assert_eq!(emoji.items[0].children[2].children.len(), 2);

        let svg = &config.menus[1];
        assert_eq!(svg.radius, 130.0);
        assert!(matches!(svg.items[0].display(), ItemDisplay::Image(_)));
    }

    #[test]
    fn test_load_alternate_naming() {
        let path = temp_file(
            "keyed.toml",
            r#"
[[menus]]
radius = 90

[[menus.items]]
key = "edit"
value = "✏️"

[[menus.items.items]]
key = "copy"
value = "📋"
"#,
        );

        let config = load_config(&path).unwrap();
        let item = &config.menus[0].items[0];
        assert_eq!(item.name.as_str(), "edit");
        assert_eq!(item.children[0].name.as_str(), "copy");
        assert!(config.menus[0].selector.is_none());
    }

    #[test]
    fn test_invalid_menu_is_reported() {
        let path = temp_file("bad.toml", "[[menus]]\nradius = -4\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Menu { index: 0, .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let config = load_or_default(Path::new("/nonexistent/rosette/config.toml"));
        assert_eq!(config.menus.len(), 2);
    }

    #[test]
    fn test_write_default_config_is_loadable() {
        let dir = std::env::temp_dir().join(format!("rosette-default-{}", std::process::id()));
        let path = dir.join("config.toml");
        write_default_config(&path).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.menus.len(), 2);

        // every image of the built-in menus lands next to the config
        for item in config.menus.iter().flat_map(|m| &m.items) {
            if let ItemDisplay::Image(image) = item.display() {
                assert!(dir.join(&image).exists(), "{} missing", image.display());
            }
        }
        let _ = fs_err::remove_dir_all(&dir);
    }
}
