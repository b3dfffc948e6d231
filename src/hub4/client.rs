//! Hub 4 Status Page Client
//!
//! Fetches the network status document from a modem's web UI.
//!
//! # Protocol
//!
//! - **Endpoint**: plain HTTP `GET` on [`STATUS_PATH`] at the device address
//! - **Authentication**: none, the status page is readable anonymously
//! - **Payload**: a positional JSON array, see [`crate::hub4::decoder`]
//!
//! # Example
//!
//! ```no_run
//! use hub4_exporter::config::Device;
//! use hub4_exporter::hub4::DeviceClient;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DeviceClient::new(Duration::from_secs(30))?;
//! let device = Device::new("living-room", "192.168.0.1");
//! let body = client.fetch(&device).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::Device;
use crate::error::{ExporterError, Result};
use std::time::Duration;
use tracing::debug;

/// Path of the status document served by the modem.
pub const STATUS_PATH: &str = "/php/ajaxGet_device_networkstatus_data.php";

/// HTTP client for modem status pages
///
/// Wraps a single `reqwest::Client`, so clones share one connection pool and
/// can be handed to every device task.
#[derive(Clone, Debug)]
pub struct DeviceClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl DeviceClient {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExporterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Status document URL for a device address.
    pub fn status_url(address: &str) -> String {
        format!("http://{}{}", address, STATUS_PATH)
    }

    /// Fetch the raw status document for a device
    ///
    /// Makes exactly one attempt. The body is read to the end before returning,
    /// which releases the connection on every path.
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::Fetch`] if the request cannot be sent, times out,
    /// answers with a non-2xx status, or the body cannot be read.
    pub async fn fetch(&self, device: &Device) -> Result<Vec<u8>> {
        let url = Self::status_url(&device.address);
        debug!("Fetching {}", url);

        let fetch_error = |reason: String| ExporterError::Fetch {
            device: device.name.clone(),
            address: device.address.clone(),
            reason,
        };

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                fetch_error(format!("timed out after {:?}", self.timeout))
            } else {
                fetch_error(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP error: {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;

        Ok(body.to_vec())
    }
}
