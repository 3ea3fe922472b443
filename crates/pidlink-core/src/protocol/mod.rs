//! Device protocol: command table, configuration codec, telemetry codec.

pub mod command;
pub mod config;
pub mod status;
pub mod variant;

pub use command::Command;
pub use config::{ConfigurationRecord, CONFIG_WIRE_LEN, VARIANT_BLOCK_LEN};
pub use status::{HistoryLog, HistoryPush, HistorySample, StatusRecord};
pub use variant::{ControlVariant, SensorVariant};
