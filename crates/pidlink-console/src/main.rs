//! PIDLink console — snapshot inspection entry point.
//!
//! The live console drives a device through a session layer that owns the
//! socket; this binary is the offline half of the tooling. It validates
//! the property schema and decodes captured device payloads (a `GetConfig`
//! or `GetState` reply saved to a file) into the same property view the
//! console renders.
//!
//! # Usage
//!
//! ```text
//! pidlink-console schema
//! pidlink-console decode-config <FILE>
//! pidlink-console decode-state <FILE>
//! ```
//!
//! Log output is controlled by `RUST_LOG` (e.g. `RUST_LOG=debug`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pidlink_console::application::PropertyStore;
use pidlink_core::{
    ConfigurationRecord, PropertySchema, StatusRecord, Value, WireReader,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PIDLink device snapshot inspector.
#[derive(Debug, Parser)]
#[command(
    name = "pidlink-console",
    about = "Inspect PIDLink device snapshots and the property schema",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Validate the builtin property schema and print the table.
    Schema,
    /// Decode a captured configuration reply and print every property.
    DecodeConfig {
        /// File holding the raw `GetConfig` payload bytes.
        file: PathBuf,
    },
    /// Decode a captured state reply and print telemetry plus history.
    DecodeState {
        /// File holding the raw `GetState` payload bytes.
        file: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // The schema is validated up front for every action: a broken table
    // must fail the process before any decode output is trusted.
    let schema = PropertySchema::builtin().context("builtin property schema is invalid")?;

    match cli.command {
        Action::Schema => print_schema(&schema),
        Action::DecodeConfig { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let config = ConfigurationRecord::decode(&mut WireReader::new(&bytes))
                .context("configuration payload did not decode")?;
            print_properties(&schema, &config, None);
        }
        Action::DecodeState { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let status = StatusRecord::decode(&mut WireReader::new(&bytes))
                .context("state payload did not decode")?;
            print_state(&schema, &status);
        }
    }

    Ok(())
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn print_schema(schema: &PropertySchema) {
    println!("{:<34} {:>5}  {:<10} {}", "path", "cmd", "type", "constraints");
    for descriptor in schema.descriptors() {
        let command = descriptor
            .command
            .map(|c| format!("{:#04x}", c.code()))
            .unwrap_or_else(|| "-".to_string());

        let mut constraints = Vec::new();
        if let Some((min, max)) = descriptor.bounds {
            constraints.push(format!("{min}..={max}"));
        }
        if let Some(list) = descriptor.enum_list {
            constraints.push(format!("enum:{list}"));
        }
        if let Some(target) = descriptor.visible_if {
            constraints.push(format!("if:{target}"));
        }
        if !descriptor.writable {
            constraints.push("read-only".to_string());
        }

        println!(
            "{:<34} {:>5}  {:<10} {}",
            descriptor.path,
            command,
            descriptor.wire_type.to_string(),
            constraints.join(", ")
        );
    }
}

fn print_properties(
    schema: &PropertySchema,
    config: &ConfigurationRecord,
    status: Option<&StatusRecord>,
) {
    let store = PropertyStore::from_snapshot(schema, config, status);

    for descriptor in schema.descriptors() {
        if descriptor.is_marker() {
            continue;
        }
        match store.get(descriptor.path) {
            Some(value) => {
                println!(
                    "{:<34} {}",
                    descriptor.path,
                    schema.render(descriptor, value)
                );
            }
            // Hidden variant rows and absent telemetry are simply skipped,
            // matching how the console hides them.
            None => {}
        }
    }
}

fn print_state(schema: &PropertySchema, status: &StatusRecord) {
    let sensor = schema.descriptor("status.sensor_value").expect("schema row");
    let control = schema.descriptor("status.control_value").expect("schema row");
    println!(
        "sensor:  {}",
        schema.render(sensor, &Value::F32(status.sensor_value))
    );
    println!(
        "control: {}",
        schema.render(control, &Value::F32(status.control_value))
    );

    if let Some(log) = &status.history {
        let ordered = log.chronological();
        println!(
            "history: {} filled of {} slots (oldest at index {})",
            ordered.len(),
            log.capacity,
            log.write_index
        );
        for sample in ordered {
            println!(
                "  {}  {}",
                schema.render(sensor, &Value::F32(sample.sensor)),
                schema.render(control, &Value::F32(sample.control))
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
