use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::{declare::Commodity, logging, util::text};

/// AuraGold 貴金屬報價
pub mod auragold;

/// 單一品項的買入、賣出報價
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PriceQuote {
    #[serde(
        rename = "aura_buy_price",
        default,
        deserialize_with = "deserialize_price"
    )]
    pub buy_price: Decimal,
    #[serde(
        rename = "aura_sell_price",
        default,
        deserialize_with = "deserialize_price"
    )]
    pub sell_price: Decimal,
    /// 報價更新時間，原樣保留 API 給的字串
    #[serde(rename = "created_at", default)]
    pub updated_at: Option<String>,
}

#[async_trait]
pub trait QuoteFetcher {
    async fn fetch(&self, commodity: Commodity) -> Result<PriceQuote>;
}

/// 取得品項的報價，失敗時記錄原因並回傳 None
pub async fn fetch_quote<F>(fetcher: &F, commodity: Commodity) -> Option<PriceQuote>
where
    F: QuoteFetcher + Sync + ?Sized,
{
    match fetcher.fetch(commodity).await {
        Ok(quote) => Some(quote),
        Err(why) => {
            logging::error_file_async(format!(
                "Failed to fetch {} quote because {:?}",
                commodity.label(),
                why
            ));
            None
        }
    }
}

/// 價格可能是數字或字串，缺少時視為 0
fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => {
            let raw = n.to_string();
            match text::parse_decimal(&raw, None) {
                Ok(price) => Ok(price),
                // 1e21 之類的科學記號
                Err(_) => Decimal::from_scientific(&raw).map_err(de::Error::custom),
            }
        }
        Some(Value::String(s)) => text::parse_decimal(&s, None).map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!("unexpected price value {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    struct Fixed(Option<PriceQuote>);

    #[async_trait]
    impl QuoteFetcher for Fixed {
        async fn fetch(&self, _commodity: Commodity) -> Result<PriceQuote> {
            self.0.clone().ok_or_else(|| anyhow!("upstream down"))
        }
    }

    #[test]
    fn test_price_quote_from_numbers_and_strings() {
        let quote: PriceQuote = serde_json::from_value(json!({
            "aura_buy_price": 93100,
            "aura_sell_price": "93,500.50",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(quote.buy_price, dec!(93100));
        assert_eq!(quote.sell_price, dec!(93500.50));
        assert_eq!(quote.updated_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_price_quote_missing_fields_default() {
        let quote: PriceQuote = serde_json::from_value(json!({
            "aura_buy_price": 1080.25,
            "aura_sell_price": null
        }))
        .unwrap();

        assert_eq!(quote.buy_price, dec!(1080.25));
        assert_eq!(quote.sell_price, Decimal::ZERO);
        assert_eq!(quote.updated_at, None);
    }

    #[test]
    fn test_price_quote_rejects_garbage() {
        assert!(serde_json::from_value::<PriceQuote>(json!({ "aura_buy_price": "n/a" })).is_err());
        assert!(serde_json::from_value::<PriceQuote>(json!({ "aura_buy_price": [1] })).is_err());
    }

    #[tokio::test]
    async fn test_fetch_quote_collapses_error_to_none() {
        assert_eq!(fetch_quote(&Fixed(None), Commodity::Gold).await, None);

        let quote = PriceQuote {
            buy_price: dec!(1),
            sell_price: dec!(2),
            updated_at: None,
        };
        assert_eq!(
            fetch_quote(&Fixed(Some(quote.clone())), Commodity::Silver).await,
            Some(quote)
        );
    }
}
