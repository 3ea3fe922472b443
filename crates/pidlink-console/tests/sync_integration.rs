//! Integration tests for the sync engine against a scripted transport.
//!
//! These exercise the full load → read → write → push flow through the
//! public API, with a fake transport standing in for the session layer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use pidlink_console::infrastructure::transport::{DeviceTransport, TransportError};
use pidlink_console::{SyncEngine, SyncError, WriteError};
use pidlink_core::protocol::config::SensorSlot;
use pidlink_core::{
    Command, ConfigurationRecord, HistoryLog, HistoryPush, HistorySample, SensorVariant,
    StatusRecord, Value, WireWriter,
};

/// In-memory device: answers snapshot queries from canned records and logs
/// every write it acknowledges.
struct FakeDevice {
    config: ConfigurationRecord,
    status: StatusRecord,
    request_count: AtomicUsize,
    writes: Mutex<HashMap<u8, Vec<u8>>>,
    fail_writes: bool,
}

impl FakeDevice {
    fn new(config: ConfigurationRecord) -> Self {
        Self {
            config,
            status: StatusRecord {
                sensor_value: 23.5,
                control_value: 0.6,
                history: Some(HistoryLog {
                    capacity: 4,
                    write_index: 2,
                    entries: vec![
                        sample(1.0),
                        sample(2.0),
                        sample(3.0),
                        sample(4.0),
                    ],
                }),
            },
            request_count: AtomicUsize::new(0),
            writes: Mutex::new(HashMap::new()),
            fail_writes: false,
        }
    }

    fn write_payload(&self, command: Command) -> Option<Vec<u8>> {
        self.writes.lock().unwrap().get(&command.code()).cloned()
    }
}

fn sample(sensor: f32) -> HistorySample {
    HistorySample {
        sensor,
        control: sensor / 10.0,
        integral: None,
    }
}

#[async_trait]
impl DeviceTransport for FakeDevice {
    async fn request(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        match command {
            Command::GetConfig => Ok(self.config.to_bytes()),
            Command::GetState => {
                let mut writer = WireWriter::new();
                self.status.encode(&mut writer);
                Ok(writer.into_bytes())
            }
            _ if self.fail_writes => Err(TransportError::Timeout),
            _ => {
                self.writes
                    .lock()
                    .unwrap()
                    .insert(command.code(), payload.to_vec());
                Ok(Vec::new())
            }
        }
    }
}

fn engine_with(config: ConfigurationRecord) -> (Arc<FakeDevice>, SyncEngine<FakeDevice>) {
    let device = Arc::new(FakeDevice::new(config));
    let engine = SyncEngine::new(Arc::clone(&device)).expect("builtin schema valid");
    (device, engine)
}

#[tokio::test]
async fn test_load_then_read_reflects_device_snapshot() {
    let (_, engine) = engine_with(ConfigurationRecord::default());
    engine.load_all().await.unwrap();

    assert_eq!(
        engine.read_property("power").await.unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        engine.read_property("status.sensor_value").await.unwrap(),
        Value::F32(23.5)
    );

    // The history block rode in on the state reply; ring replay starts at
    // the write index.
    let history = engine.history().await.unwrap();
    assert_eq!(history.axis_hints, None);
    let ordered = history.log.chronological();
    assert_eq!(
        ordered.iter().map(|s| s.sensor).collect::<Vec<_>>(),
        vec![3.0, 4.0, 1.0, 2.0]
    );
}

#[tokio::test]
async fn test_load_issues_exactly_two_requests() {
    let (device, engine) = engine_with(ConfigurationRecord::default());
    engine.load_all().await.unwrap();
    assert_eq!(device.request_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_write_encodes_value_under_property_command() {
    let (device, engine) = engine_with(ConfigurationRecord::default());
    engine.load_all().await.unwrap();

    engine
        .write_property("pid.interval", Value::U16(250))
        .await
        .unwrap();

    assert_eq!(
        device.write_payload(Command::PidInterval),
        Some(250u16.to_le_bytes().to_vec())
    );
    assert_eq!(
        engine.read_property("pid.interval").await.unwrap(),
        Value::U16(250)
    );
}

#[tokio::test]
async fn test_write_fixed_string_pads_to_field() {
    let (device, engine) = engine_with(ConfigurationRecord::default());
    engine.load_all().await.unwrap();

    engine
        .write_property("system.mdns_name", Value::Text("brewery".to_string()))
        .await
        .unwrap();

    let payload = device.write_payload(Command::MdnsName).unwrap();
    assert_eq!(payload.len(), 32);
    assert_eq!(&payload[..8], b"brewery\0");
}

#[tokio::test]
async fn test_variant_write_follows_active_sensor() {
    let analog = ConfigurationRecord {
        sensor: SensorSlot::from_variant(SensorVariant::Analog {
            pin: 4,
            resolution: 10,
        }),
        ..ConfigurationRecord::default()
    };
    let (device, engine) = engine_with(analog);
    engine.load_all().await.unwrap();

    // The analog rows are live, the digital rows are not.
    engine
        .write_property("sensor.analog.resolution", Value::U8(12))
        .await
        .unwrap();
    assert_eq!(
        device.write_payload(Command::AnalogResolution),
        Some(vec![12])
    );

    let err = engine
        .write_property("sensor.digital.pin", Value::U8(7))
        .await
        .unwrap_err();
    assert!(matches!(err, WriteError::NotApplicable { .. }));
    assert_eq!(device.write_payload(Command::DigitalTempPin), None);
}

#[tokio::test]
async fn test_failed_write_does_not_touch_store() {
    let device = Arc::new(FakeDevice {
        fail_writes: true,
        ..FakeDevice::new(ConfigurationRecord::default())
    });
    let engine = SyncEngine::new(Arc::clone(&device)).unwrap();
    engine.load_all().await.unwrap();

    let err = engine
        .write_property("pid.target", Value::F32(50.0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WriteError::Transport(TransportError::Timeout)
    ));
    assert_eq!(
        engine.read_property("pid.target").await.unwrap(),
        Value::F32(30.0)
    );
}

#[tokio::test]
async fn test_push_loop_feeds_store_from_channel() {
    let (_, engine) = engine_with(ConfigurationRecord::default());
    engine.load_all().await.unwrap();
    let engine = Arc::new(engine);

    let (tx, rx) = mpsc::channel(8);
    let loop_handle = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run_push_loop(rx).await }
    });

    tx.send((Command::SensorValue, 24.5f32.to_le_bytes().to_vec()))
        .await
        .unwrap();

    let push = HistoryPush {
        sensor_min: 20.0,
        sensor_max: 25.0,
        log: HistoryLog {
            capacity: 1,
            write_index: 0,
            entries: vec![HistorySample {
                sensor: 24.5,
                control: 0.5,
                integral: Some(0.2),
            }],
        },
    };
    let mut writer = WireWriter::new();
    push.encode(&mut writer);
    tx.send((Command::HistoryData, writer.into_bytes()))
        .await
        .unwrap();

    drop(tx);
    loop_handle.await.unwrap();

    assert_eq!(
        engine.read_property("status.sensor_value").await.unwrap(),
        Value::F32(24.5)
    );
    let history = engine.history().await.unwrap();
    assert_eq!(history.axis_hints, Some((20.0, 25.0)));
    assert_eq!(history.log.entries[0].integral, Some(0.2));
}

#[tokio::test]
async fn test_restart_issues_bare_command() {
    let (device, engine) = engine_with(ConfigurationRecord::default());
    engine.restart_device().await.unwrap();
    assert_eq!(device.write_payload(Command::Restart), Some(Vec::new()));
}

#[tokio::test]
async fn test_unknown_path_write_is_rejected_without_io() {
    let (device, engine) = engine_with(ConfigurationRecord::default());

    let err = engine
        .write_property("regulator.bogus", Value::Bool(true))
        .await
        .unwrap_err();
    assert!(matches!(err, WriteError::UnknownProperty(_)));
    assert_eq!(device.request_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reload_replaces_snapshot_atomically() {
    let (_, engine) = engine_with(ConfigurationRecord::default());
    engine.load_all().await.unwrap();
    engine
        .write_property("pid.target", Value::F32(55.0))
        .await
        .unwrap();

    // A reload pulls the device's canned snapshot again, replacing the
    // locally-updated entry wholesale.
    engine.load_all().await.unwrap();
    assert_eq!(
        engine.read_property("pid.target").await.unwrap(),
        Value::F32(30.0)
    );
}

#[tokio::test]
async fn test_busy_error_is_reported_for_overlapping_loads() {
    // Covered in depth by the engine unit tests; here we only assert the
    // error shape is observable through the crate's public API.
    let (_, engine) = engine_with(ConfigurationRecord::default());
    let engine = Arc::new(engine);

    let first = engine.load_all();
    let second = engine.load_all();
    let (a, b) = tokio::join!(first, second);

    let failures = [a, b]
        .into_iter()
        .filter(|r| matches!(r, Err(SyncError::Busy)))
        .count();
    // With a fast fake transport the first load may finish before the
    // second starts; overlap is the only case that must yield Busy.
    assert!(failures <= 1);
    assert_eq!(
        engine.read_property("power").await.unwrap(),
        Value::Bool(true)
    );
}
