//! Cycle replay: drives the encoder and carries emitted frames forward

use crate::config::{CycleConfig, CARRIED_MESSAGES};
use hkg_can_encoder::{CanFrame, Encoder, MessagePacker, Result, SignalFrame};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// ACC option set and front-radar advertisement go out every this many cycles
const OPTION_PERIOD: u64 = 5;

/// Packer wrapper that remembers the last values packed per message
pub struct SnapshotPacker<P> {
    inner: P,
    packed: RefCell<BTreeMap<String, SignalFrame>>,
}

impl<P> SnapshotPacker<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            packed: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drain the values recorded since the last call
    pub fn take(&self) -> BTreeMap<String, SignalFrame> {
        self.packed.take()
    }
}

impl<P: MessagePacker> MessagePacker for SnapshotPacker<P> {
    fn pack(&self, message: &str, bus: u8, values: &SignalFrame) -> Result<CanFrame> {
        let frame = self.inner.pack(message, bus, values)?;
        self.packed
            .borrow_mut()
            .insert(message.to_string(), values.clone());
        Ok(frame)
    }
}

/// Replay state: the previous-frame snapshots owned on the caller side
pub struct Replay<P> {
    encoder: Encoder<SnapshotPacker<P>>,
    snapshots: BTreeMap<String, SignalFrame>,
}

impl<P: MessagePacker> Replay<P> {
    pub fn new(encoder: Encoder<SnapshotPacker<P>>, snapshots: BTreeMap<String, SignalFrame>) -> Self {
        Self { encoder, snapshots }
    }

    pub fn encoder(&self) -> &Encoder<SnapshotPacker<P>> {
        &self.encoder
    }

    pub fn snapshot(&self, message: &str) -> Option<&SignalFrame> {
        self.snapshots.get(message)
    }

    /// Emit every frame due in cycle `frame`, in transmit order
    pub fn run_cycle(&mut self, frame: u64, cycle: &CycleConfig) -> Result<Vec<CanFrame>> {
        let mut out = Vec::new();

        if let Some(previous) = self.snapshots.get("LKAS11") {
            out.push(self.encoder.lkas11(frame, &cycle.lkas, previous)?);
        }

        if let (Some(button), Some(previous)) = (cycle.button, self.snapshots.get("CLU11")) {
            out.push(self.encoder.clu11(previous, button, cycle.speed)?);
        }

        if self.encoder.profile().has_extended_signaling() {
            let hud = match self.snapshots.get("LFAHDA_MFC") {
                Some(previous) => self.encoder.hda_mfc(&cycle.hda, previous)?,
                None => self.encoder.lfahda_mfc(cycle.lkas.enabled, cycle.hda.active, 0)?,
            };
            out.push(hud);
        }

        if let Some(previous) = self.snapshots.get("MDPS12") {
            out.push(self.encoder.mdps12(frame, previous)?);
        }

        if cycle.long_control {
            let scc12 = self.snapshots.get("SCC12");
            out.extend(self.encoder.acc_commands(frame, &cycle.acc, scc12)?);

            if frame % OPTION_PERIOD == 0 {
                out.extend(self.encoder.acc_opt()?);
                out.push(self.encoder.frt_radar_opt()?);
            }
        }

        for (message, values) in self.encoder.packer().take() {
            if CARRIED_MESSAGES.contains(&message.as_str()) {
                self.snapshots.insert(message, values);
            }
        }

        log::debug!("Cycle {}: {} frames", frame, out.len());
        Ok(out)
    }
}
