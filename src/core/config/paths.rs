use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub config_path: PathBuf,
    pub secrets_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let project_root = discover_project_root();
        Self::from_root(project_root)
    }

    pub fn from_root(project_root: PathBuf) -> Self {
        let config_path = env::var("DOCSQA_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root.join("config.yml"));
        let secrets_path = env::var("DOCSQA_SECRETS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| sibling_secrets_path(&config_path));

        AppPaths {
            project_root,
            config_path,
            secrets_path,
        }
    }

    /// Resolves a configured path relative to the project root.
    pub fn resolve(&self, raw: &Path) -> PathBuf {
        if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.project_root.join(raw)
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn sibling_secrets_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|dir| dir.join("secrets.yaml"))
        .unwrap_or_else(|| PathBuf::from("secrets.yaml"))
}

fn discover_project_root() -> PathBuf {
    if let Ok(root) = env::var("DOCSQA_ROOT") {
        return PathBuf::from(root);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("config.yml").exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}
