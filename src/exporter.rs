//! Collection Orchestrator
//!
//! Runs one collection cycle across every configured device and hands back the
//! merged sample set.
//!
//! # Cycle
//!
//! 1. Take the cycle lock; a scrape arriving mid-cycle waits for it
//! 2. Hand the lock to a coordinator task that outlives the caller
//! 3. Spawn one task per device: fetch → decode → map → send samples
//! 4. Join every task, drain the sample channel, then release the lock
//!
//! # Error Handling
//!
//! A device whose fetch or decode fails is logged as a warning and contributes
//! only `hub4_scrape_status = 0`. Other devices are unaffected and the cycle
//! always completes. A slow device delays the cycle by at most the client
//! timeout.

use crate::collectors::{self, CollectionStatus};
use crate::config::Device;
use crate::hub4::{decode, DeviceClient};
use crate::metrics::MetricSample;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Outcome counts of one collection cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl CycleSummary {
    /// Healthy unless every device in the cycle failed.
    pub fn is_healthy(&self) -> bool {
        self.succeeded > 0 || self.failed == 0
    }
}

/// Result of one collection cycle.
#[derive(Debug, Clone)]
pub struct Scrape {
    pub samples: Vec<MetricSample>,
    pub summary: CycleSummary,
}

/// What one device pipeline produced.
#[derive(Debug, Clone)]
pub struct DeviceReport {
    pub status: CollectionStatus,
    pub samples: Vec<MetricSample>,
}

/// Polls every configured device on demand
///
/// # Thread Safety
///
/// `Exporter` is `Send + Sync` and meant to be shared behind an `Arc`. The
/// cycle lock serializes [`Exporter::scrape`] calls; device tasks inside one
/// cycle run concurrently.
///
/// Each cycle runs in its own task which holds the cycle lock until every
/// device task has been joined. Dropping a `scrape` future (for example when
/// Prometheus gives up on the request) leaves that cycle running to the end,
/// and the next scrape waits for it.
pub struct Exporter {
    devices: Arc<[Device]>,
    client: DeviceClient,
    cycle: Arc<Mutex<()>>,
    last_cycle: Arc<RwLock<Option<CycleSummary>>>,
}

impl Exporter {
    pub fn new(devices: Vec<Device>, client: DeviceClient) -> Self {
        Self {
            devices: devices.into(),
            client,
            cycle: Arc::new(Mutex::new(())),
            last_cycle: Arc::new(RwLock::new(None)),
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Summary of the most recent completed cycle, if any.
    pub async fn last_cycle(&self) -> Option<CycleSummary> {
        *self.last_cycle.read().await
    }

    /// Run one collection cycle across all devices.
    pub async fn scrape(&self) -> Scrape {
        // Lock so no more than 1 cycle runs at once
        let guard = self.cycle.clone().lock_owned().await;

        let devices = self.devices.clone();
        let client = self.client.clone();
        let last_cycle = self.last_cycle.clone();

        let coordinator = tokio::spawn(async move {
            let scrape = run_cycle(&client, &devices).await;
            *last_cycle.write().await = Some(scrape.summary);
            drop(guard);
            scrape
        });

        match coordinator.await {
            Ok(scrape) => scrape,
            Err(e) => {
                error!("Collection cycle aborted: {}", e);
                let samples = self
                    .devices
                    .iter()
                    .flat_map(collectors::failed_device)
                    .collect();
                Scrape {
                    samples,
                    summary: CycleSummary {
                        succeeded: 0,
                        failed: self.devices.len(),
                    },
                }
            }
        }
    }
}

/// Poll every device concurrently and merge their samples.
async fn run_cycle(client: &DeviceClient, devices: &[Device]) -> Scrape {
    info!("Collecting metrics from {} device(s)", devices.len());

    let (tx, mut rx) = mpsc::unbounded_channel::<DeviceReport>();

    let handles: Vec<_> = devices
        .iter()
        .cloned()
        .map(|device| {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let report = collect_device(&client, &device).await;
                // The receiver is only dropped after every task is joined.
                let _ = tx.send(report);
            })
        })
        .collect();
    drop(tx);

    let mut summary = CycleSummary::default();
    let mut samples = Vec::new();

    // Wait for all devices to complete their poll
    for (device, joined) in devices.iter().zip(join_all(handles).await) {
        if let Err(e) = joined {
            error!("Collection task for {} aborted: {}", device.name, e);
            summary.failed += 1;
            samples.extend(collectors::failed_device(device));
        }
    }

    while let Some(report) = rx.recv().await {
        match report.status {
            CollectionStatus::Success => summary.succeeded += 1,
            CollectionStatus::Failed => summary.failed += 1,
        }
        samples.extend(report.samples);
    }

    info!(
        "Collected {} samples ({} device(s) ok, {} failed)",
        samples.len(),
        summary.succeeded,
        summary.failed
    );

    Scrape { samples, summary }
}

/// Fetch, decode and map one device.
///
/// Never fails: fetch and decode errors are logged and turned into a single
/// `hub4_scrape_status = 0` sample.
pub async fn collect_device(client: &DeviceClient, device: &Device) -> DeviceReport {
    info!("Collecting for instance: {} ({})", device.name, device.address);

    let body = match client.fetch(device).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to fetch status for {}: {}", device.name, e);
            return failed(device);
        }
    };

    let snapshot = match decode(&body) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Failed to decode status for {}: {}", device.name, e);
            return failed(device);
        }
    };

    debug!(
        "{}: DS status '{}', US status '{}', boot file '{}', scheduling '{}', primary channel '{}'",
        device.name,
        snapshot.acquired_ds_status,
        snapshot.ranged_us_status,
        snapshot.boot_file,
        snapshot.scheduling_type,
        snapshot.primary_channel_type
    );

    DeviceReport {
        status: CollectionStatus::Success,
        samples: collectors::map_snapshot(device, &snapshot),
    }
}

fn failed(device: &Device) -> DeviceReport {
    DeviceReport {
        status: CollectionStatus::Failed,
        samples: collectors::failed_device(device),
    }
}
