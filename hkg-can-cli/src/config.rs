//! Session file loading and parsing

use anyhow::{Context, Result};
use hkg_can_encoder::{AccCommand, EncoderConfig, HdaCommand, LkasCommand, SignalFrame};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Messages whose emitted values become the next cycle's snapshot
pub const CARRIED_MESSAGES: [&str; 5] = ["LKAS11", "CLU11", "MDPS12", "SCC12", "LFAHDA_MFC"];

/// A scripted replay session (loaded from session.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionFile {
    pub session: EncoderConfig,
    /// Initial previous-frame snapshots, keyed by message name
    #[serde(default)]
    pub snapshots: BTreeMap<String, SignalFrame>,
    #[serde(default, rename = "cycle")]
    pub cycles: Vec<CycleConfig>,
}

/// Command state for one control cycle
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CycleConfig {
    pub lkas: LkasCommand,
    pub hda: HdaCommand,
    pub acc: AccCommand,
    /// Cruise button to forward in CLU11
    pub button: Option<u8>,
    /// Cluster speed sent alongside the button
    pub speed: f64,
    /// Emit the ACC command set
    pub long_control: bool,
    /// Number of consecutive cycles this entry covers (default: 1)
    pub repeat: Option<u32>,
}

impl SessionFile {
    /// Cycles with `repeat` expanded, in replay order
    pub fn expanded_cycles(&self) -> impl Iterator<Item = &CycleConfig> {
        self.cycles.iter().flat_map(|cycle| {
            let count = cycle.repeat.unwrap_or(1).max(1) as usize;
            std::iter::repeat(cycle).take(count)
        })
    }
}

/// Load a session from a TOML file
pub fn load_session(path: &Path) -> Result<SessionFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {:?}", path))?;

    parse_session(&content).with_context(|| format!("Failed to parse session file: {:?}", path))
}

pub fn parse_session(content: &str) -> Result<SessionFile> {
    let session: SessionFile = toml::from_str(content)?;

    for name in session.snapshots.keys() {
        if !CARRIED_MESSAGES.contains(&name.as_str()) {
            log::warn!("Snapshot for {} is never read", name);
        }
    }
    if session.cycles.is_empty() {
        log::warn!("Session has no [[cycle]] entries");
    }

    Ok(session)
}
