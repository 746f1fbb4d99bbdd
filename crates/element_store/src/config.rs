use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};

use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "periodic_table.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub fetch_delay_ms: u64,
    pub update_delay_ms: u64,
    pub search_debounce_ms: u64,
    pub notification_duration_ms: u64,
    pub dataset_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 2000,
            update_delay_ms: 200,
            search_debounce_ms: 2000,
            notification_duration_ms: 5000,
            dataset_path: None,
        }
    }
}

impl Settings {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }
}

/// Defaults, then the TOML file at `path` (or `periodic_table.toml`), then
/// `APP__*` environment variables.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        apply_toml(&mut settings, &raw);
    }

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub(crate) fn apply_toml(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!("ignoring malformed settings file: {err}");
            return;
        }
    };

    for (key, value) in file_cfg {
        let text = match value {
            toml::Value::String(v) => v,
            toml::Value::Integer(v) => v.to_string(),
            other => {
                warn!(key = %key, value = %other, "ignoring settings value of unsupported type");
                continue;
            }
        };
        apply_value(settings, &key, &text);
    }
}

pub(crate) fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in [
        "fetch_delay_ms",
        "update_delay_ms",
        "search_debounce_ms",
        "notification_duration_ms",
        "dataset_path",
    ] {
        let env_key = format!("APP__{}", key.to_ascii_uppercase());
        if let Some(v) = lookup(&env_key) {
            apply_value(settings, key, &v);
        }
    }
}

fn apply_value(settings: &mut Settings, key: &str, value: &str) {
    let slot = match key {
        "fetch_delay_ms" => &mut settings.fetch_delay_ms,
        "update_delay_ms" => &mut settings.update_delay_ms,
        "search_debounce_ms" => &mut settings.search_debounce_ms,
        "notification_duration_ms" => &mut settings.notification_duration_ms,
        "dataset_path" => {
            let value = value.trim();
            settings.dataset_path = (!value.is_empty()).then(|| PathBuf::from(value));
            return;
        }
        _ => {
            warn!(key, "ignoring unknown settings key");
            return;
        }
    };

    match value.trim().parse::<u64>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value, "ignoring non-numeric settings value"),
    }
}
