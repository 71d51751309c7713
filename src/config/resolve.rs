use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, RoadmapConfig};

#[derive(Debug, Clone)]
pub struct ResolvedRoot {
    pub root: PathBuf,
    /// `None` when no config file exists and defaults apply.
    pub config_path: Option<PathBuf>,
}

pub fn resolve_root_with_overrides(
    start: impl AsRef<Path>,
    root: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<ResolvedRoot, ConfigError> {
    if let Some(root) = root {
        return resolve_with_root(root);
    }

    if let Some(config) = config_path {
        return resolve_with_config(config);
    }

    if let Ok(path) = env::var("ROADMAP_ROOT") {
        return resolve_with_root(PathBuf::from(path));
    }

    if let Ok(path) = env::var("ROADMAP_CONFIG") {
        return resolve_with_config(PathBuf::from(path));
    }

    Ok(find_root_from(start.as_ref()))
}

pub fn load_config(resolved: &ResolvedRoot) -> Result<RoadmapConfig, ConfigError> {
    let mut config = match resolved.config_path.as_deref() {
        Some(path) if path.is_file() => parse_config(path)?,
        _ => RoadmapConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

pub fn parse_config(path: &Path) -> Result<RoadmapConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut RoadmapConfig) {
    if let Ok(dir) = env::var("ROADMAP_DATA_DIR") {
        config.data.dir = dir;
    }
}

fn resolve_with_root(root: PathBuf) -> Result<ResolvedRoot, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::InvalidRoot(root));
    }

    let config_path = root.join(".roadmap").join("config.toml");
    Ok(ResolvedRoot {
        root,
        config_path: Some(config_path),
    })
}

fn resolve_with_config(config_path: PathBuf) -> Result<ResolvedRoot, ConfigError> {
    if !config_path.is_file() {
        return Err(ConfigError::ConfigNotFound(config_path));
    }
    let root = infer_root_from_config(&config_path)
        .ok_or_else(|| ConfigError::InvalidRoot(config_path.clone()))?;

    Ok(ResolvedRoot {
        root,
        config_path: Some(config_path),
    })
}

fn infer_root_from_config(config_path: &Path) -> Option<PathBuf> {
    let parent = config_path.parent()?;
    if parent.file_name()? == ".roadmap" {
        return parent.parent().map(|p| p.to_path_buf());
    }

    Some(parent.to_path_buf())
}

fn find_root_from(start: &Path) -> ResolvedRoot {
    for ancestor in start.ancestors() {
        let config_path = ancestor.join(".roadmap").join("config.toml");
        if config_path.is_file() {
            return ResolvedRoot {
                root: ancestor.to_path_buf(),
                config_path: Some(config_path),
            };
        }
    }

    ResolvedRoot {
        root: start.to_path_buf(),
        config_path: None,
    }
}
