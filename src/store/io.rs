//! Commands file I/O

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use super::CommandStore;
use crate::error::ProcRunError;

impl CommandStore {
    /// Load the catalogue stored under the `[panel]` table of `path`.
    ///
    /// A missing file or a file without that table yields an empty store.
    pub fn load(path: &Path, panel: &str) -> Result<Self, ProcRunError> {
        let Some(table) = read_table(path)? else {
            debug!("No commands file at {}", path.display());
            return Ok(Self::default());
        };

        match table.get(panel) {
            Some(section) => section
                .clone()
                .try_into::<CommandStore>()
                .map_err(|source| ProcRunError::Parse {
                    path: path.to_path_buf(),
                    source,
                }),
            None => Ok(Self::default()),
        }
    }

    /// Write the catalogue under the `[panel]` table of `path`.
    ///
    /// Tables of other panels in the same file are kept.
    pub fn save(&self, path: &Path, panel: &str) -> Result<(), ProcRunError> {
        let mut table = read_table(path)?.unwrap_or_default();
        table.insert(panel.to_string(), toml::Value::try_from(self)?);
        let content = toml::to_string_pretty(&table)?;

        write_locked_atomic(path, &content).map_err(|source| ProcRunError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved {} commands to {}", self.command_count(), path.display());
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, ProcRunError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ProcRunError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<toml::Table>(&content)
        .map(Some)
        .map_err(|source| ProcRunError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Replace `path` with `content` under an exclusive lock file.
///
/// Writes a temp file next to the target and renames it over, creating the
/// parent directory if needed.
pub(crate) fn write_locked_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    // Separate lock file so the rename does not drop the lock
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(sibling_path(path, ".lock"))?;
    lock_file.lock_exclusive()?;

    let temp_path = sibling_path(path, ".tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.sync_all()?;

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_path_appends_suffix() {
        let path = Path::new("/tmp/procrun/commands.toml");
        assert_eq!(
            sibling_path(path, ".lock"),
            PathBuf::from("/tmp/procrun/commands.toml.lock")
        );
    }
}
