//! Init command implementation

use anyhow::{Result, bail};
use std::path::Path;

/// Default configuration content for procrun init
pub const DEFAULT_CONFIG: &str = r#"# procrun configuration
#
# Available options:
#   auto_close_finished - Remove a tab as soon as its process finishes (default: false)
#   close_on_last       - Close the panel when the last tab goes away (default: false)
#   start_timeout_ms    - How long to wait for a program to start (default: 5000)
#   close_grace_ms      - Wait after killing everything on window close (default: 500)
#   tick_interval_ms    - GUI refresh interval while processes run (default: 100)
#   output_limit_bytes  - Output kept per tab, 0 = unbounded (default: 1048576)
#   panel_name          - Table of the commands file this panel uses (default: "procrun")
#   commands_file       - Saved commands file (default: ~/.procrun/commands.toml)

[settings]
auto_close_finished = false
close_on_last = false
start_timeout_ms = 5000
close_grace_ms = 500
tick_interval_ms = 100
output_limit_bytes = 1048576
panel_name = "procrun"
"#;

/// Write the default configuration to `config_path`
pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use procrun::config::Config;

    #[test]
    fn test_default_config_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_command(&path, false).unwrap();
        assert!(init_command(&path, false).is_err());
        init_command(&path, true).unwrap();
    }
}
