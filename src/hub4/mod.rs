pub mod client;
pub mod decoder;
pub mod types;

pub use client::DeviceClient;
pub use decoder::decode;
pub use types::TelemetrySnapshot;
