use std::time::Duration;

use crate::config;

pub mod price;

/// AuraGold 報價 API
#[derive(Debug, Clone)]
pub struct AuraGold {
    base_url: String,
    timeout: Duration,
}

impl AuraGold {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        AuraGold {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(api: &config::Api) -> Self {
        Self::new(api.base_url.clone(), api.timeout())
    }
}
