//! LKAS11: steering torque request and lane-keep display state

use crate::builders::pack_with_checksum;
use crate::checksum::alive_counter;
use crate::config::EncoderConfig;
use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};
use crate::vehicle::LkasHints;
use serde::{Deserialize, Serialize};

/// Lane-keep command state for one control cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LkasCommand {
    /// Requested steering torque (signed, raw torque units)
    pub apply_steer: i64,
    /// Steering request active
    pub steer_req: bool,
    /// Show the "keep hands on wheel" warning
    pub sys_warning: bool,
    /// LDWS system state shown on the cluster
    pub sys_state: u8,
    /// Lateral control engaged
    pub enabled: bool,
    /// Left lane line visible
    pub left_lane: bool,
    /// Right lane line visible
    pub right_lane: bool,
    /// Left lane-departure warning level
    pub left_lane_depart: u8,
    /// Right lane-departure warning level
    pub right_lane_depart: u8,
}

impl LkasCommand {
    fn hints(&self) -> LkasHints {
        LkasHints {
            enabled: self.enabled,
            sys_warning: self.sys_warning,
            left_lane: self.left_lane,
            right_lane: self.right_lane,
        }
    }
}

/// Build LKAS11 on top of the previous LKAS11 frame
pub fn create_lkas11<P: MessagePacker + ?Sized>(
    packer: &P,
    config: &EncoderConfig,
    frame: u64,
    cmd: &LkasCommand,
    previous: &SignalFrame,
) -> Result<CanFrame> {
    let profile = config.vehicle.profile();

    let overlay = SignalFrame::new()
        .with("CF_Lkas_LdwsSysState", cmd.sys_state)
        .with("CF_Lkas_SysWarning", if cmd.sys_warning { 3 } else { 0 })
        .with("CF_Lkas_LdwsLHWarning", cmd.left_lane_depart)
        .with("CF_Lkas_LdwsRHWarning", cmd.right_lane_depart)
        .with("CR_Lkas_StrToqReq", cmd.apply_steer)
        .with("CF_Lkas_ActToi", cmd.steer_req)
        .with("CF_Lkas_ToiFlt", 0)
        .with("CF_Lkas_MsgCount", alive_counter(frame))
        .with("CF_Lkas_Chksum", 0);

    let hints = cmd.hints();
    let mut values = SignalFrame::merge(previous, &overlay);
    for rule in profile.lkas_overrides(config.ldws_opt) {
        values = rule.apply(&values, &hints, previous)?;
    }

    log::debug!(
        "LKAS11 frame {} for {}: torque={} active={} checksum={}",
        frame,
        config.vehicle.ident(),
        cmd.apply_steer,
        cmd.steer_req,
        profile.checksum
    );

    pack_with_checksum(packer, "LKAS11", config.lkas_bus, values, "CF_Lkas_Chksum", |data| {
        profile.checksum.compute(data)
    })
}
