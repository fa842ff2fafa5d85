use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Local;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    crawler::{auragold::AuraGold, PriceQuote, QuoteFetcher},
    declare::Commodity,
    util,
};

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Option<Value>,
}

impl AuraGold {
    /// 組出報價網址，t 參數帶目前的時間戳避免拿到快取的資料
    fn quote_url(&self, commodity: Commodity, timestamp: i64) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|why| anyhow!("Invalid base url {} because {:?}", self.base_url, why))?;
        url.query_pairs_mut()
            .append_pair("product", commodity.product_code())
            .append_pair("t", &timestamp.to_string());

        Ok(url)
    }
}

#[async_trait]
impl QuoteFetcher for AuraGold {
    async fn fetch(&self, commodity: Commodity) -> Result<PriceQuote> {
        let url = self.quote_url(commodity, Local::now().timestamp())?;
        let res = util::http::get_json::<ApiResponse>(url.as_str(), self.timeout).await?;

        let data = match res.data {
            Some(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => return Err(anyhow!("No {} price data in response from {}", commodity, url)),
        };

        serde_json::from_value::<PriceQuote>(data)
            .map_err(|why| anyhow!("Failed to parse {} price data because {:?}", commodity, why))
    }
}
