use std::path::{Path, PathBuf};

pub const USAGE: &str = "usage: tibia-spells <asset-root> [data-dir]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Asset root; logs go to `<root>/log`.
    pub root: PathBuf,
    /// Directory holding `spells.dat`.
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        Self::from_args_with_env(args, |key| std::env::var(key).ok())
    }

    pub fn from_args_with_env(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        if args.len() < 2 {
            return Err(USAGE.to_string());
        }

        let root = Path::new(&args[1]).to_path_buf();
        let data_dir = if args.len() > 2 {
            PathBuf::from(&args[2])
        } else {
            env("TIBIA_DATA_PATH")
                .and_then(|value| {
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(trimmed))
                    }
                })
                .unwrap_or_else(|| root.join("dat"))
        };
        Ok(Self { root, data_dir })
    }
}
