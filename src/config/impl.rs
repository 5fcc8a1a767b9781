use std::path::Path;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration from "config.toml" in the current directory.
///
/// If the file doesn't exist, uses in-memory defaults.
///
/// # Examples
/// ```no_run
/// use commsboard::config::init_config;
/// init_config();
/// ```
pub fn init_config() {
    init_config_from("config.toml");
}

/// Initialize the global configuration from an explicit TOML path (`-c/--config`).
pub fn init_config_from<P: AsRef<Path>>(path: P) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load_from(path.as_ref())));
}

/// Replace the global configuration
///
/// 测试中用于指向临时数据库；首次调用时完成初始化。
pub fn set_config(config: StaticConfig) {
    match CONFIG.get() {
        Some(current) => current.store(Arc::new(config)),
        None => {
            let _ = CONFIG.set(ArcSwap::from_pointee(config));
        }
    }
}
