// Registry configuration.

use crate::settings::Settings;

/// Which clock the timestamp column is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneChoice {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    pub time_zone: TimeZoneChoice,
    /// Forwarded to the page source with every request. `None` lets the
    /// source pick its own page size.
    pub page_limit: Option<usize>,
}

impl RegistryConfig {
    /// Reads `logs.utc` and `logs.page_limit`.
    pub fn from_settings(settings: &Settings) -> Self {
        let time_zone = if settings.get("logs.utc", false) {
            TimeZoneChoice::Utc
        } else {
            TimeZoneChoice::Local
        };
        Self {
            time_zone,
            page_limit: settings.get_opt("logs.page_limit"),
        }
    }
}

/// Options for [`LogStreamRegistry::get_log_content`](crate::LogStreamRegistry::get_log_content).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix every record with a timestamp column and a tab.
    pub timestamps: bool,
}

impl RenderOptions {
    pub fn timestamped() -> Self {
        Self { timestamps: true }
    }
}
