use std::{fs, path::Path};

use anyhow::{anyhow, Result};

use crate::{crawler::PriceQuote, util::text};

const TEMPLATE: &str = include_str!("template.html");

const GOLD_BUY: &str = "[G_BUY]";
const GOLD_SELL: &str = "[G_SELL]";
const SILVER_BUY: &str = "[S_BUY]";
const SILVER_SELL: &str = "[S_SELL]";
const UPDATED_AT: &str = "[TIME]";

/// API 沒有給更新時間時顯示的字樣
const UPDATED_AT_FALLBACK: &str = "Live Update";

/// 看板需要的兩個品項報價，兩者都取得後才會輸出
#[derive(Debug, Clone, PartialEq)]
pub struct Rates {
    pub gold: PriceQuote,
    pub silver: PriceQuote,
}

impl Rates {
    pub fn new(gold: PriceQuote, silver: PriceQuote) -> Self {
        Rates { gold, silver }
    }

    /// 以黃金報價的時間作為看板的更新時間
    pub fn updated_at(&self) -> &str {
        self.gold
            .updated_at
            .as_deref()
            .unwrap_or(UPDATED_AT_FALLBACK)
    }
}

/// Fills the template with the four formatted prices and the update time.
///
/// Prices are substituted before the time, so a time string that happens to
/// contain a placeholder is written verbatim.
pub fn render(rates: &Rates) -> String {
    TEMPLATE
        .replace(GOLD_BUY, &text::format_currency(rates.gold.buy_price))
        .replace(GOLD_SELL, &text::format_currency(rates.gold.sell_price))
        .replace(SILVER_BUY, &text::format_currency(rates.silver.buy_price))
        .replace(SILVER_SELL, &text::format_currency(rates.silver.sell_price))
        .replace(UPDATED_AT, rates.updated_at())
}

/// 覆寫輸出檔，不做暫存檔或 rename
pub fn write(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html)
        .map_err(|why| anyhow!("Failed to write dashboard {:?} because {:?}", path, why))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn rates() -> Rates {
        Rates::new(
            PriceQuote {
                buy_price: dec!(93100),
                sell_price: dec!(93500),
                updated_at: Some("2024-01-01T00:00:00Z".to_string()),
            },
            PriceQuote {
                buy_price: dec!(1080),
                sell_price: dec!(1100),
                updated_at: Some("2024-01-01T00:00:05Z".to_string()),
            },
        )
    }

    #[test]
    fn test_render() {
        let html = render(&rates());

        assert!(html.contains(r#"<span>Buy</span><span class="val">₹93,100.00</span>"#));
        assert!(html.contains(r#"<span>Sell</span><span class="val">₹93,500.00</span>"#));
        assert!(html.contains(r#"<span>Buy</span><span class="val">₹1,080.00</span>"#));
        assert!(html.contains(r#"<span>Sell</span><span class="val">₹1,100.00</span>"#));
        assert!(html.contains("API Last Updated: 2024-01-01T00:00:00Z<br>"));
        assert!(!html.contains("2024-01-01T00:00:05Z"));

        for placeholder in [GOLD_BUY, GOLD_SELL, SILVER_BUY, SILVER_SELL, UPDATED_AT] {
            assert!(!html.contains(placeholder), "{} left in output", placeholder);
        }
    }

    #[test]
    fn test_render_keeps_order_of_values() {
        let html = render(&rates());
        let positions: Vec<usize> = ["₹93,100.00", "₹93,500.00", "₹1,080.00", "₹1,100.00"]
            .iter()
            .map(|v| html.find(v).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.find("GOLD 24K (1g)").unwrap() < positions[0]);
        assert!(html.find("SILVER (1kg)").unwrap() < positions[2]);
    }

    #[test]
    fn test_render_is_idempotent() {
        assert_eq!(render(&rates()), render(&rates()));
    }

    #[test]
    fn test_render_fallback_time() {
        let mut rates = rates();
        rates.gold.updated_at = None;

        assert!(render(&rates).contains("API Last Updated: Live Update<br>"));
    }

    #[test]
    fn test_render_time_is_substituted_last() {
        let mut rates = rates();
        rates.gold.updated_at = Some("[G_BUY]".to_string());

        assert!(render(&rates).contains("API Last Updated: [G_BUY]<br>"));
    }

    #[test]
    fn test_write_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        write(&path, "<html></html>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn test_write_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("index.html");

        assert!(write(&path, "<html></html>").is_err());
    }
}
