use std::{env, path::PathBuf};

use once_cell::sync::Lazy;

use crate::constants::{defaults, envvars};

pub static ROOT_DIR: Lazy<PathBuf> = Lazy::new(root_dir);

pub static SOFTWARE_CONFIG: Lazy<PathBuf> =
    Lazy::new(|| ROOT_DIR.join(defaults::SOFTWARE_CONFIG_FILE));

pub static HARDWARE_CONFIG: Lazy<PathBuf> =
    Lazy::new(|| ROOT_DIR.join(defaults::HARDWARE_CONFIG_FILE));

fn root_dir() -> PathBuf {
    if let Ok(root_dir) = env::var(envvars::ROOT_DIR) {
        return root_dir.into();
    }
    PathBuf::from(defaults::ROOT_DIR)
}
