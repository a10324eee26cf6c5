use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::ui::layout::ViewportClass;
use crate::utils::{app_data_dir, ensure_dir, write_atomic};

const CONFIG_FILE: &str = "config.json";

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: [&str; 6] = [
    "locale",
    "theme",
    "page_size",
    "mobile_breakpoint",
    "toast_seconds",
    "plain_output",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Rows per page in directory listings.
    pub page_size: usize,
    /// Terminal width (columns) below which modals use the compact layout.
    pub mobile_breakpoint: u16,
    pub toast_seconds: u64,
    /// Disable colours and box drawing.
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            theme: None,
            page_size: 10,
            mobile_breakpoint: 80,
            toast_seconds: 4,
            plain_output: false,
        }
    }
}

impl Config {
    pub fn viewport(&self, columns: u16) -> ViewportClass {
        ViewportClass::for_width(columns, self.mobile_breakpoint)
    }

    pub fn get(&self, key: &str) -> Result<String, PortalError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "theme" => self.theme.clone().unwrap_or_default(),
            "page_size" => self.page_size.to_string(),
            "mobile_breakpoint" => self.mobile_breakpoint.to_string(),
            "toast_seconds" => self.toast_seconds.to_string(),
            "plain_output" => self.plain_output.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PortalError> {
        let value = value.trim();
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(PortalError::Config("locale cannot be empty".into()));
                }
                self.locale = value.to_string();
            }
            "theme" => {
                self.theme = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "page_size" => self.page_size = parse_positive(key, value)?,
            "mobile_breakpoint" => self.mobile_breakpoint = parse_positive(key, value)?,
            "toast_seconds" => self.toast_seconds = parse_positive(key, value)?,
            "plain_output" => {
                self.plain_output = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => {
                        return Err(PortalError::Config(format!(
                            "plain_output expects true or false, got `{}`",
                            value
                        )))
                    }
                }
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> PortalError {
    PortalError::Config(format!(
        "unknown setting `{}` (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, PortalError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed != T::default() => Ok(parsed),
        _ => Err(PortalError::Config(format!(
            "{} must be a positive whole number, got `{}`",
            key, value
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, PortalError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, PortalError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Missing file yields defaults.
    pub fn load(&self) -> Result<Config, PortalError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), PortalError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
