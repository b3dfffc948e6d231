//! Shared helpers: fake modems served by axum on ephemeral ports.

#![allow(dead_code)]

use axum::{http::StatusCode, routing::get, Router};
use hub4_exporter::config::Device;
use hub4_exporter::hub4::client::STATUS_PATH;
use hub4_exporter::metrics::MetricSample;
use std::net::SocketAddr;
use std::time::Duration;

/// A realistic status document: 3 DS 3.0 channels (one unlocked), 2 US
/// channels plus one id 0 padding entry, 1 DS 3.1 channel.
pub const STATUS_DOCUMENT: &str = r#"[
    331000000, 49600000, "Locked", "Completed", 1, "true", 16, "true", 3.1,
    "cmreg-vmdg640-bbt076-b.cm", 14393, 230000000, 42600, 0, 14394, 21000000,
    42600, 0, 1522, "BestEffort",
    [[1,331000000,4.2,40.3,"256QAM","Locked",40.3,12,0],
     [2,339000000,4.0,40.9,"256QAM","Locked",40.9,7,1],
     [3,347000000,3.6,38.6,"256QAM","Not Locked",38.6,0,0]],
    [[1,49600000,44.3,"5120","64QAM","ATDMA",0,0,2,0],
     [2,43100000,43.8,"5120","64QAM","ATDMA",1,0,0,0],
     [0,0,0,"0","","",0,0,0,0]],
    [],
    [[33,94,"4K",1880,"QAM4096",1108000000,"Locked",41,7.5,1500,0]],
    [],
    2, 3, 0, 1, "SC-QAM"
]"#;

/// Number of samples [`STATUS_DOCUMENT`] maps to: 21 scalars, 3x6 DS,
/// 2x5 US, 1x8 DS 3.1.
pub const STATUS_DOCUMENT_SAMPLES: usize = 21 + 18 + 10 + 8;

/// Serve `router` on 127.0.0.1 with an ephemeral port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });
    addr
}

/// A modem answering the status path with `body`.
pub async fn spawn_modem(body: &'static str) -> SocketAddr {
    spawn_server(Router::new().route(STATUS_PATH, get(move || async move { body }))).await
}

/// A modem answering the status path with an error status.
pub async fn spawn_failing_modem(status: StatusCode) -> SocketAddr {
    spawn_server(Router::new().route(STATUS_PATH, get(move || async move { (status, "nope") })))
        .await
}

/// A modem that takes `delay` before answering.
pub async fn spawn_slow_modem(delay: Duration) -> SocketAddr {
    spawn_server(Router::new().route(
        STATUS_PATH,
        get(move || async move {
            tokio::time::sleep(delay).await;
            STATUS_DOCUMENT
        }),
    ))
    .await
}

/// An address nothing is listening on.
pub async fn closed_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    listener.local_addr().expect("Failed to read local addr")
}

pub fn device_at(name: &str, addr: SocketAddr) -> Device {
    Device::new(name, addr.to_string())
}

/// First sample named `name` whose labels include every pair in `labels`.
pub fn find<'a>(
    samples: &'a [MetricSample],
    name: &str,
    labels: &[(&str, &str)],
) -> Option<&'a MetricSample> {
    samples.iter().find(|s| {
        s.name() == name && labels.iter().all(|(k, v)| s.label(k) == Some(*v))
    })
}

pub fn count(samples: &[MetricSample], name: &str) -> usize {
    samples.iter().filter(|s| s.name() == name).count()
}
