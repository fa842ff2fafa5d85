use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;

use crate::{logging::Logger, util};

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// The overall request timeout is not set here; every request carries its own.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        util::ensure_rustls_crypto_provider();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(8))
            // ===== TCP 優化 =====
            .tcp_nodelay(true)
            // ===== 連接池 =====
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            // ===== 重定向 =====
            .redirect(reqwest::redirect::Policy::limited(5))
            // ===== Headers =====
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP GET request and deserializes the JSON response into the specified type.
///
/// # Arguments
///
/// * `url`: The URL to send the GET request to.
/// * `timeout`: Upper bound for the whole request, from connecting to reading the body.
///
/// # Returns
///
/// * `Result<RES>`: The deserialized response, or an error if the request fails,
///   the status is not a success or the body cannot be deserialized.
pub async fn get_json<RES: DeserializeOwned>(url: &str, timeout: Duration) -> Result<RES> {
    get_response(url, timeout)
        .await?
        .json::<RES>()
        .await
        .map_err(|e| anyhow!("Error parsing response JSON from {}: {:?}", url, e))
}

/// Performs an HTTP GET request and returns the response when its status is 2xx.
pub async fn get_response(url: &str, timeout: Duration) -> Result<Response> {
    let response = send(Method::GET, url, timeout).await?;
    let status = response.status();

    if !status.is_success() {
        return Err(anyhow!("Unexpected status {} from {}", status, url));
    }

    Ok(response)
}

/// Sends a single HTTP request. Failed requests are not retried; the next scheduled run is the retry.
async fn send(method: Method, url: &str, timeout: Duration) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let start = Instant::now();
    let res = client.request(method, url).timeout(timeout).send().await;
    let elapsed = start.elapsed().as_millis();

    match res {
        Ok(response) => {
            LOGGER.info(format!("{} {} {} ms", visit_log, response.status(), elapsed));
            Ok(response)
        }
        Err(why) => {
            LOGGER.error(format!(
                "{} failed because {:?}. {} ms",
                visit_log, why, elapsed
            ));
            Err(anyhow!("Failed to send request to {}: {:?}", url, why))
        }
    }
}
