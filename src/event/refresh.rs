use std::path::Path;

use anyhow::Result;

use crate::{
    config::App,
    crawler::{auragold::AuraGold, fetch_quote, QuoteFetcher},
    dashboard::{self, Rates},
    declare::Commodity,
    logging,
};

/// 單次更新的結果
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 看板已覆寫
    Updated,
    /// 任一報價取得失敗，保留舊的看板
    Skipped,
}

/// 依設定抓取報價並更新看板
pub async fn execute(settings: &App) -> Result<Outcome> {
    let fetcher = AuraGold::from_config(&settings.api);
    run(&fetcher, &settings.dashboard.output_path).await
}

/// Fetches gold then silver and rewrites `output` when both quotes are present.
///
/// A missing quote is not an error: the previous file is left untouched and
/// [`Outcome::Skipped`] is returned. Only a failed write is reported as `Err`.
pub async fn run<F>(fetcher: &F, output: &Path) -> Result<Outcome>
where
    F: QuoteFetcher + Sync + ?Sized,
{
    let gold = fetch_quote(fetcher, Commodity::Gold).await;
    let silver = fetch_quote(fetcher, Commodity::Silver).await;

    let rates = match (gold, silver) {
        (Some(gold), Some(silver)) => Rates::new(gold, silver),
        _ => {
            logging::error_console(
                "API Error: Fetch failed. Keeping previous version.".to_string(),
            );
            logging::warn_file_async(format!("Skip updating {:?}", output));
            return Ok(Outcome::Skipped);
        }
    };

    let html = dashboard::render(&rates);
    dashboard::write(output, &html)?;

    logging::info_console("Dashboard Updated Successfully.".to_string());
    logging::info_file_async(format!(
        "Dashboard {:?} updated, rates as of {}",
        output,
        rates.updated_at()
    ));

    Ok(Outcome::Updated)
}
