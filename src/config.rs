use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub dashboard: Dashboard,
}

const AURAGOLD_BASE_URL: &str = "AURAGOLD_BASE_URL";
const AURAGOLD_TIMEOUT_SECS: &str = "AURAGOLD_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.auragold.in/api/data/v1/prices";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 報價 API
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Api {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Api {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Api {
    fn default() -> Self {
        Api {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const DASHBOARD_OUTPUT_PATH: &str = "DASHBOARD_OUTPUT_PATH";

const DEFAULT_OUTPUT_PATH: &str = "index.html";

/// 輸出的 html
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dashboard {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard {
            output_path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

impl App {
    /// 讀取 app.json (若存在)，再以 env 覆蓋
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    fn load_from(config_path: PathBuf) -> Result<Self> {
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(base_url) = env::var(AURAGOLD_BASE_URL) {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = env::var(AURAGOLD_TIMEOUT_SECS) {
            match u64::from_str(timeout.trim()) {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(why) => logging::error_file_async(format!(
                    "Ignore {}={} because {:?}",
                    AURAGOLD_TIMEOUT_SECS, timeout, why
                )),
            }
        }

        if let Ok(output_path) = env::var(DASHBOARD_OUTPUT_PATH) {
            self.dashboard.output_path = PathBuf::from(output_path);
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
