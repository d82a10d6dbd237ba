//! Monitoring-service reputation lookup
//!
//! Queries the UptimeRobot API for historical uptime of a host. Disabled
//! entirely when no API key is configured; every failure degrades to a
//! placeholder string.

use reqwest::Client;
use serde::Deserialize;

const GET_MONITORS_URL: &str = "https://api.uptimerobot.com/v2/getMonitors";
const UPTIME_RATIO_DAYS: &str = "30";

pub const NOT_CONFIGURED: &str = "Not configured";
pub const NOT_FOUND: &str = "Not found in monitoring service";
pub const PLACEHOLDER: &str = "Could not be determined";

#[derive(Debug, Deserialize)]
struct MonitorsResponse {
    stat: String,
    #[serde(default)]
    monitors: Vec<Monitor>,
}

#[derive(Debug, Deserialize)]
struct Monitor {
    status: i64,
    #[serde(default)]
    custom_uptime_ratio: String,
}

/// Look up the host in the monitoring service.
///
/// Returns `Not configured` without touching the network when no key is
/// set.
pub async fn lookup(client: &Client, api_key: Option<&str>, host: &str) -> String {
    let Some(api_key) = api_key else {
        return NOT_CONFIGURED.to_string();
    };

    let params = [
        ("api_key", api_key),
        ("search", host),
        ("custom_uptime_ratios", UPTIME_RATIO_DAYS),
        ("format", "json"),
    ];

    let response = match client.post(GET_MONITORS_URL).form(&params).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("Reputation lookup failed for {host}: {err}");
            return PLACEHOLDER.to_string();
        }
    };

    match response.json::<MonitorsResponse>().await {
        Ok(body) if body.stat == "ok" => match body.monitors.first() {
            Some(monitor) => format!(
                "Monitored - Status: {} (Uptime: {}%)",
                status_label(monitor.status),
                monitor.custom_uptime_ratio
            ),
            None => NOT_FOUND.to_string(),
        },
        Ok(body) => {
            tracing::warn!("Reputation lookup for {host} returned stat={}", body.stat);
            PLACEHOLDER.to_string()
        }
        Err(err) => {
            tracing::warn!("Reputation response for {host} unparseable: {err}");
            PLACEHOLDER.to_string()
        }
    }
}

/// Fixed mapping of the monitoring service's numeric status codes.
fn status_label(status: i64) -> &'static str {
    match status {
        0 => "Paused",
        1 => "Not Checked Yet",
        2 => "Up",
        8 => "Seems Down",
        9 => "Down",
        _ => "Unknown",
    }
}
