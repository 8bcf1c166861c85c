//! Main encoder API
//!
//! The `Encoder` struct bundles a message packer with the session
//! configuration and exposes one method per outgoing message. It keeps no
//! per-cycle state: snapshots and frame indices always come from the caller.

use crate::builders::{self, AccCommand, HdaCommand, LkasCommand};
use crate::config::EncoderConfig;
use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};
use crate::vehicle::VehicleProfile;

/// Entry point for all encoding operations
pub struct Encoder<P> {
    packer: P,
    config: EncoderConfig,
}

impl<P: MessagePacker> Encoder<P> {
    /// Create an encoder for one session
    pub fn new(packer: P, config: EncoderConfig) -> Self {
        log::info!(
            "Encoder for {} (LKAS11 checksum {}, radar_disable={})",
            config.vehicle,
            config.vehicle.profile().checksum,
            config.radar_disable
        );
        Self { packer, config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn packer(&self) -> &P {
        &self.packer
    }

    /// Checksum class and LKAS11 variant of the session vehicle
    pub fn profile(&self) -> VehicleProfile {
        self.config.vehicle.profile()
    }

    /// LKAS11 steering/lane-keep frame
    ///
    /// # Example
    /// ```no_run
    /// use hkg_can_encoder::{DbcPacker, Encoder, EncoderConfig, LkasCommand, SignalFrame, VehicleId};
    /// use std::path::Path;
    ///
    /// let mut packer = DbcPacker::new();
    /// packer.add_dbc(Path::new("hyundai_kia_generic.dbc")).unwrap();
    ///
    /// let encoder = Encoder::new(packer, EncoderConfig::new(VehicleId::SantaFe));
    /// let stock_lkas11 = SignalFrame::new(); // last LKAS11 seen on the bus
    /// let cmd = LkasCommand { apply_steer: 50, steer_req: true, ..Default::default() };
    /// let frame = encoder.lkas11(17, &cmd, &stock_lkas11).unwrap();
    /// println!("{}", frame);
    /// ```
    pub fn lkas11(&self, frame: u64, cmd: &LkasCommand, previous: &SignalFrame) -> Result<CanFrame> {
        builders::create_lkas11(&self.packer, &self.config, frame, cmd, previous)
    }

    /// CLU11 cruise button frame
    pub fn clu11(&self, previous: &SignalFrame, button: u8, speed: f64) -> Result<CanFrame> {
        builders::create_clu11(&self.packer, &self.config, previous, button, speed)
    }

    /// Stateless LFAHDA_MFC frame
    pub fn lfahda_mfc(&self, enabled: bool, active: u8, warning: u8) -> Result<CanFrame> {
        builders::create_lfahda_mfc(&self.packer, enabled, active, warning)
    }

    /// Stateful LFAHDA_MFC frame
    pub fn hda_mfc(&self, cmd: &HdaCommand, previous: &SignalFrame) -> Result<CanFrame> {
        builders::create_hda_mfc(&self.packer, cmd, previous)
    }

    /// MDPS12 steering-motor status frame
    pub fn mdps12(&self, frame: u64, previous: &SignalFrame) -> Result<CanFrame> {
        builders::create_mdps12(&self.packer, &self.config, frame, previous)
    }

    /// ACC command set, in transmit order
    pub fn acc_commands(
        &self,
        frame: u64,
        cmd: &AccCommand,
        previous_scc12: Option<&SignalFrame>,
    ) -> Result<Vec<CanFrame>> {
        builders::create_acc_commands(&self.packer, &self.config, frame, cmd, previous_scc12)
    }

    /// ACC option advertisement, in transmit order
    pub fn acc_opt(&self) -> Result<Vec<CanFrame>> {
        builders::create_acc_opt(&self.packer, &self.config)
    }

    /// Front-radar presence advertisement
    pub fn frt_radar_opt(&self) -> Result<CanFrame> {
        builders::create_frt_radar_opt(&self.packer)
    }
}
