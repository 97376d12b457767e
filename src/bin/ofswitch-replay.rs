//! Replays a JSON trace of switch control events through the controller and
//! logs every command it would send.
//!
//! ```bash
//! ofswitch-replay demos/two_hosts.json --config demos/timeouts.json --log debug
//! ```

use anyhow::Context;
use bytes::Bytes;
use clap::Parser;
use futures::StreamExt;
use log::{info, warn};
use rusty_ofswitch::core::SessionStats;
use rusty_ofswitch::event::{PacketInEvent, ParsedFrame};
use rusty_ofswitch::representation::{BufferId, PortId, SwitchId};
use rusty_ofswitch::{Controller, ControllerConfig};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ofswitch-replay")]
#[command(about = "Replay switch control events through the learning switch", long_about = None)]
struct Args {
    /// JSON trace of control events
    trace: PathBuf,

    /// Controller configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log specification, e.g. "info" or "debug, rusty_ofswitch::core=trace"
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "event", rename_all = "snake_case")]
enum TraceEvent {
    ConnectionUp {
        switch: u64,
    },
    PacketIn {
        switch: u64,
        in_port: u16,
        #[serde(default)]
        buffer_id: Option<u32>,
        /// Hex encoded frame.
        #[serde(default)]
        data: Option<String>,
    },
    ConnectionDown {
        switch: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = flexi_logger::Logger::try_with_str(&args.log)?.start()?;

    let config = match &args.config {
        Some(path) => ControllerConfig::from_file(path)?,
        None => ControllerConfig::default(),
    };
    let trace = std::fs::read(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let trace: Vec<TraceEvent> = serde_json::from_slice(&trace).context("parsing trace")?;

    let (controller, handle) = Controller::new(config);
    let running = tokio::spawn(controller.run());
    let mut printers = Vec::new();

    for event in trace {
        match event {
            TraceEvent::ConnectionUp { switch } => {
                let switch = SwitchId(switch);
                let mut commands = handle.connection_up(switch)?;
                printers.push(tokio::spawn(async move {
                    while let Some(command) = commands.next().await {
                        info!(target:"replay", "{} <- {:?}", switch, command);
                    }
                }));
            }
            TraceEvent::PacketIn {
                switch,
                in_port,
                buffer_id,
                data,
            } => {
                let buffer_id = buffer_id.map(BufferId);
                let event = match data {
                    Some(data) => {
                        let data = hex::decode(&data).context("decoding packet data")?;
                        PacketInEvent::from_data(PortId(in_port), buffer_id, Bytes::from(data))
                    }
                    None => {
                        warn!(target:"replay", "packet-in on {} port {} has no data", switch, in_port);
                        PacketInEvent::new(PortId(in_port), buffer_id, None, ParsedFrame::Incomplete)
                    }
                };
                handle.packet_in(SwitchId(switch), event)?;
            }
            TraceEvent::ConnectionDown { switch } => handle.connection_down(SwitchId(switch))?,
        }
    }
    drop(handle);

    let stats: BTreeMap<String, SessionStats> = running
        .await?
        .into_iter()
        .map(|(switch, stats)| (switch.to_string(), stats))
        .collect();
    for printer in printers {
        printer.await?;
    }
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
