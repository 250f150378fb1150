//! Configuration access port.
//!
//! Lookups are by `[section] key`. A missing or blank key yields the caller's
//! default; a value that is present but does not parse is a `ConfigInvalid`
//! error. Range checks happen later in config validation.

use crate::domain::error::TicktraderError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TicktraderError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TicktraderError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, TicktraderError>;

    fn has_key(&self, section: &str, key: &str) -> bool {
        self.get_string(section, key).is_some()
    }

    /// Periods, limits and counts. A negative value is an error rather than
    /// a silent default.
    fn get_usize(&self, section: &str, key: &str, default: usize) -> Result<usize, TicktraderError> {
        let value = self.get_int(section, key, default as i64)?;
        usize::try_from(value)
            .map_err(|_| TicktraderError::invalid(section, key, format!("{} must not be negative", key)))
    }

    /// Reads a percentage and returns it as a fraction; `default` is already
    /// a fraction.
    fn get_percent(&self, section: &str, key: &str, default: f64) -> Result<f64, TicktraderError> {
        if self.has_key(section, key) {
            Ok(self.get_double(section, key, default * 100.0)? / 100.0)
        } else {
            Ok(default)
        }
    }
}
