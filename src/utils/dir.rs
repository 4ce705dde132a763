use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

pub const CONFIG_FILE: &str = "config.json";
pub const DATA_FILE: &str = "data.json";
pub const LOCK_FILE: &str = "daemon.lock";

pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA should be present on Windows"))?;
            path.push("readtrack");
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
            path.push("readtrack");
            path
        }
    };

    ensure_dir(path)
}

/// Resolves an explicitly provided application directory or falls back to the default one.
pub fn resolve_application_path(dir: Option<PathBuf>) -> Result<PathBuf> {
    dir.map_or_else(create_application_default_path, ensure_dir)
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    // The daemon changes its working directory when detaching, relative paths would break.
    let path = std::path::absolute(path)?;
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

pub fn config_path(app_dir: &Path) -> PathBuf {
    app_dir.join(CONFIG_FILE)
}

pub fn data_path(app_dir: &Path) -> PathBuf {
    app_dir.join(DATA_FILE)
}

pub fn lock_path(app_dir: &Path) -> PathBuf {
    app_dir.join(LOCK_FILE)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::resolve_application_path;

    #[test]
    fn explicit_dir_is_created() -> Result<()> {
        let root = tempdir()?;
        let nested = root.path().join("a").join("b");

        let resolved = resolve_application_path(Some(nested.clone()))?;

        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
        Ok(())
    }
}
