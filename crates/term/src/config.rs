//! Display configuration.

use std::time::Duration;

use crate::types::{Size, DEFAULT_COLS, DEFAULT_COMPOSITE_FPS, DEFAULT_FPS, DEFAULT_ROWS};

/// Accepted refresh rates, per second. Anything else falls back to the default.
const MIN_RATE: f64 = 0.1;
const MAX_RATE: f64 = 1000.0;

/// Grid dimensions and refresh cadences.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub cols: u16,
    pub rows: u16,
    /// Terminal flushes per second.
    pub fps: f64,
    /// Panel composites per second.
    pub composite_fps: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            fps: DEFAULT_FPS,
            composite_fps: DEFAULT_COMPOSITE_FPS,
        }
    }
}

impl DisplayConfig {
    pub fn new(cols: u16, rows: u16, fps: f64) -> Self {
        Self {
            cols,
            rows,
            fps,
            ..Self::default()
        }
    }

    /// Read overrides from `KITTEN_COLS`, `KITTEN_ROWS`, `KITTEN_FPS` and
    /// `KITTEN_COMPOSITE_FPS`. Missing or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cols = lookup("KITTEN_COLS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&c: &u16| c > 0)
            .unwrap_or(defaults.cols);
        let rows = lookup("KITTEN_ROWS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&r: &u16| r > 0)
            .unwrap_or(defaults.rows);
        let fps = lookup("KITTEN_FPS")
            .and_then(|s| parse_rate(&s))
            .unwrap_or(defaults.fps);
        let composite_fps = lookup("KITTEN_COMPOSITE_FPS")
            .and_then(|s| parse_rate(&s))
            .unwrap_or(defaults.composite_fps);

        Self {
            cols,
            rows,
            fps,
            composite_fps,
        }
    }

    pub fn with_composite_fps(mut self, composite_fps: f64) -> Self {
        self.composite_fps = composite_fps;
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.cols, self.rows)
    }

    /// Time between terminal flushes.
    pub fn frame_interval(&self) -> Duration {
        rate_to_interval(self.fps, DEFAULT_FPS)
    }

    /// Time between panel composites.
    pub fn composite_interval(&self) -> Duration {
        rate_to_interval(self.composite_fps, DEFAULT_COMPOSITE_FPS)
    }
}

fn valid_rate(rate: f64) -> bool {
    (MIN_RATE..=MAX_RATE).contains(&rate)
}

fn parse_rate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|&r| valid_rate(r))
}

fn rate_to_interval(rate: f64, fallback: f64) -> Duration {
    let rate = if valid_rate(rate) { rate } else { fallback };
    Duration::from_secs_f64(1.0 / rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.size(), Size::new(80, 24));
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
        assert_eq!(config.composite_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = DisplayConfig::from_lookup(|key| match key {
            "KITTEN_COLS" => Some("120".to_string()),
            "KITTEN_ROWS" => Some(" 36 ".to_string()),
            "KITTEN_FPS" => Some("15".to_string()),
            "KITTEN_COMPOSITE_FPS" => Some("-3".to_string()),
            _ => None,
        });
        assert_eq!(config.cols, 120);
        assert_eq!(config.rows, 36);
        assert_eq!(config.fps, 15.0);
        assert_eq!(config.composite_fps, DEFAULT_COMPOSITE_FPS);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = DisplayConfig::from_lookup(|key| match key {
            "KITTEN_COLS" => Some("wide".to_string()),
            "KITTEN_ROWS" => Some("0".to_string()),
            "KITTEN_FPS" => Some("NaN".to_string()),
            _ => None,
        });
        assert_eq!(config, DisplayConfig::default());
    }

    #[test]
    fn test_invalid_rate_in_struct_uses_default_interval() {
        let config = DisplayConfig::new(10, 3, 0.0);
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_extreme_rates_fall_back() {
        let config = DisplayConfig::from_lookup(|key| match key {
            "KITTEN_FPS" => Some("1e-30".to_string()),
            "KITTEN_COMPOSITE_FPS" => Some("1e30".to_string()),
            _ => None,
        });
        assert_eq!(config.fps, DEFAULT_FPS);
        assert_eq!(config.composite_fps, DEFAULT_COMPOSITE_FPS);

        let config = DisplayConfig::new(10, 3, 1e-30).with_composite_fps(f64::INFINITY);
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
        assert_eq!(config.composite_interval(), Duration::from_millis(50));

        let config = DisplayConfig::new(10, 3, 0.1).with_composite_fps(1000.0);
        assert_eq!(config.frame_interval(), Duration::from_secs(10));
        assert_eq!(config.composite_interval(), Duration::from_millis(1));
    }
}
