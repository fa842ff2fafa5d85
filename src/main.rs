pub mod config;
pub mod crawler;
pub mod dashboard;
pub mod declare;
pub mod event;
pub mod logging;
pub mod util;

use std::{env, process::ExitCode};

use anyhow::Result;

use crate::event::refresh;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let code = match start().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(why) => {
            logging::error_console(format!("{:?}", why));
            logging::error_file_async(format!("BullionBoard failed because {:?}", why));
            ExitCode::FAILURE
        }
    };

    logging::flush();
    code
}

async fn start() -> Result<()> {
    let settings = config::App::load()?;

    logging::info_file_async(format!(
        "BullionBoard 啟動 Rust OS/Arch: {}/{} api: {} output: {:?}",
        env::consts::OS,
        env::consts::ARCH,
        settings.api.base_url,
        settings.dashboard.output_path
    ));

    let outcome = refresh::execute(&settings).await?;
    logging::info_file_async(format!("BullionBoard finished: {:?}", outcome));

    Ok(())
}
