//! INI file configuration adapter.

use crate::domain::error::TicktraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TicktraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TicktraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TicktraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TicktraderError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn unparsable(section: &str, key: &str, raw: &str, reason: String) -> TicktraderError {
        TicktraderError::invalid(section, key, format!("cannot parse {:?}: {}", raw, reason))
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TicktraderError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(default);
        };
        self.config
            .getint(section, key)
            .map(|v| v.unwrap_or(default))
            .map_err(|reason| Self::unparsable(section, key, &raw, reason))
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TicktraderError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(default);
        };
        self.config
            .getfloat(section, key)
            .map(|v| v.unwrap_or(default))
            .map_err(|reason| Self::unparsable(section, key, &raw, reason))
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, TicktraderError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(value) => Self::parse_bool(&value).ok_or_else(|| {
                Self::unparsable(
                    section,
                    key,
                    &value,
                    "expected true/false, yes/no, on/off or 1/0".to_string(),
                )
            }),
        }
    }
}
