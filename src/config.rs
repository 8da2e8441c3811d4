use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{StoreLinkTable, Theme};

pub(crate) const DEFAULT_BUTTON_LABEL: &str = "Rate us";

/// Caller-facing construction options.
///
/// Field names serialize in camelCase so a host page's JSON config can be
/// passed through untouched. Optional numeric fields follow the widget's
/// falsy policy: absent (and a zero frequency) means "use the default",
/// while an explicitly negative value is a configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub headline: String,
    pub text: String,
    /// Unix-epoch milliseconds of the extension install.
    pub install_date: i64,
    pub store_links: StoreLinkTable,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub button_label: Option<String>,
    /// Milliseconds that must elapse (strictly) before the prompt may show.
    #[serde(default)]
    pub timeout_ms: Option<i64>,
    /// Total number of times the prompt may ever be shown.
    #[serde(default)]
    pub frequency: Option<i64>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl PopupOptions {
    /// Apply defaults and reject out-of-range values.
    pub fn validate(self) -> Result<PopupConfig> {
        let timeout_ms = match self.timeout_ms {
            None => 0,
            Some(t) if t < 0 => {
                return Err(Error::Config(format!(
                    "timeoutMs must be >= 0, got {}",
                    t
                )))
            }
            Some(t) => t,
        };

        let frequency = match self.frequency {
            None | Some(0) => 1,
            Some(f) if f < 0 => {
                return Err(Error::Config(format!(
                    "frequency must be >= 1, got {}",
                    f
                )))
            }
            Some(f) => u32::try_from(f)
                .map_err(|_| Error::Config(format!("frequency out of range: {}", f)))?,
        };

        Ok(PopupConfig {
            headline: self.headline,
            text: self.text,
            install_date_ms: self.install_date,
            store_links: self.store_links,
            logo: self.logo.unwrap_or_default(),
            button_label: self
                .button_label
                .unwrap_or_else(|| DEFAULT_BUTTON_LABEL.to_string()),
            timeout_ms,
            frequency,
            theme: self.theme.unwrap_or_default(),
        })
    }
}

/// Validated configuration as the controller consumes it: defaults applied,
/// options collapsed to plain values.
#[derive(Debug, Clone)]
pub struct PopupConfig {
    pub headline: String,
    pub text: String,
    pub install_date_ms: i64,
    pub store_links: StoreLinkTable,
    pub logo: String,
    pub button_label: String,
    pub timeout_ms: i64,
    pub frequency: u32,
    pub theme: Theme,
}
