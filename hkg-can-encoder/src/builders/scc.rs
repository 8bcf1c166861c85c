//! Smart cruise control (SCC) and forward-collision (FCA) messages
//!
//! Covers the per-cycle ACC command set (SCC11, SCC12, SCC14, FCA11), the
//! slower option advertisement (SCC13, FCA12) and the front-radar presence
//! frame (FRT_RADAR11). The returned frames must go out in order.

use crate::builders::pack_with_checksum;
use crate::checksum::{alive_counter, fca_alive_field, nibble_checksum};
use crate::config::EncoderConfig;
use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};
use serde::{Deserialize, Serialize};

/// SCC12 signals a fresh frame sends as 0 (VSM and AEB requests stay off)
const SCC12_IDLE: [&str; 14] = [
    "CF_VSM_Prefill",
    "CF_VSM_DecCmdAct",
    "CF_VSM_HBACmd",
    "CF_VSM_Warn",
    "CF_VSM_Stat",
    "CF_VSM_BeltCmd",
    "ACCFailInfo",
    "CR_VSM_DecCmd",
    "TakeOverReq",
    "PreFill",
    "CF_VSM_ConfMode",
    "AEB_Failinfo",
    "AEB_Status",
    "AEB_CmdAct",
];

/// FCA11 signals held at 0 while the builder stands in for the radar
const FCA11_IDLE: [&str; 11] = [
    "CF_VSM_Prefill",
    "CF_VSM_HBACmd",
    "CF_VSM_Warn",
    "CF_VSM_BeltCmd",
    "CF_VSM_DecCmdAct",
    "FCA_CmdAct",
    "FCA_StopReq",
    "FCA_Failinfo",
    "CR_VSM_DecCmd",
    "FCA_RelativeVelocity",
    "FCA_TimetoCollision",
];

fn idle_frame(signals: &[&str]) -> SignalFrame {
    signals.iter().map(|&name| (name, 0.into())).collect()
}

/// Longitudinal command state for one control cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccCommand {
    /// Longitudinal control engaged
    pub enabled: bool,
    /// Requested acceleration (m/s^2)
    pub accel: f64,
    /// Jerk magnitude budget (m/s^3)
    pub jerk: f64,
    pub lead_visible: bool,
    /// Distance to the lead vehicle (m)
    pub lead_dist: f64,
    /// Displayed set speed
    pub set_speed: f64,
    pub stopping: bool,
    /// Following-distance setting
    pub gap_setting: u8,
    pub gas_pressed: bool,
    /// Driver alert requested
    pub warning: bool,
}

/// SCC12 `ACCMode`
///
/// 2 while the driver overrides with the accelerator, 1 while engaged. When
/// disengaged the radar-disable mode reports 4 instead of the idle 0: the
/// stock radar never returns to 0 after its first disengagement.
pub fn acc_mode(enabled: bool, gas_pressed: bool, radar_disable: bool) -> u8 {
    match (enabled, gas_pressed) {
        (true, true) => 2,
        (true, false) => 1,
        (false, _) if radar_disable => 4,
        (false, _) => 0,
    }
}

/// SCC14 `ACCMode`: like SCC12 but always 4 when disengaged
fn scc14_acc_mode(enabled: bool, gas_pressed: bool) -> u8 {
    acc_mode(enabled, gas_pressed, true)
}

/// SCC14 `ObjGap` bucket for the lead distance, 0 without a lead
pub fn lead_gap_bucket(lead_visible: bool, lead_dist: f64) -> u8 {
    if !lead_visible {
        0
    } else if lead_dist < 25.0 {
        1
    } else if lead_dist < 40.0 {
        2
    } else if lead_dist < 60.0 {
        3
    } else if lead_dist < 80.0 {
        4
    } else {
        5
    }
}

fn scc11_values(config: &EncoderConfig, frame: u64, cmd: &AccCommand) -> SignalFrame {
    let enabled = cmd.enabled;
    SignalFrame::new()
        .with("MainMode_ACC", config.radar_disable || enabled)
        .with("SCCInfoDisplay", 0)
        .with("TauGapSet", if enabled { cmd.gap_setting } else { 0 })
        .with("VSetDis", if enabled { cmd.set_speed } else { 0.0 })
        .with("AliveCounterACC", alive_counter(frame))
        .with("ObjValid", cmd.lead_visible)
        .with("ACC_ObjStatus", cmd.lead_visible)
        .with("ACC_ObjLatPos", 0)
        .with("ACC_ObjRelSpd", 0)
        .with("ACC_ObjDist", 0)
        .with("Navi_SCC_Curve_Status", 2)
        .with("Navi_SCC_Curve_Act", 0)
        .with("Navi_SCC_Camera_Act", 0)
        .with("Navi_SCC_Camera_Status", 0)
        .with("DriverAlertDisplay", cmd.warning)
}

fn scc12_values(
    config: &EncoderConfig,
    frame: u64,
    cmd: &AccCommand,
    previous: Option<&SignalFrame>,
) -> SignalFrame {
    let enabled = cmd.enabled;
    let accel = if enabled { cmd.accel } else { 0.0 };

    let overlay = SignalFrame::new()
        .with("ACCMode", acc_mode(enabled, cmd.gas_pressed, config.radar_disable))
        .with("StopReq", enabled && cmd.stopping && !cmd.gas_pressed)
        .with("aReqRaw", accel)
        // stock ramps aReqValue toward aReqRaw within the jerk limit
        .with("aReqValue", accel)
        .with("CR_VSM_Alive", alive_counter(frame));

    match previous {
        Some(base) if !config.radar_disable => SignalFrame::merge(base, &overlay),
        _ => SignalFrame::merge(&idle_frame(&SCC12_IDLE), &overlay),
    }
}

fn scc14_values(cmd: &AccCommand) -> SignalFrame {
    let enabled = cmd.enabled;
    let jerk_upper = if enabled && !cmd.stopping { cmd.jerk.max(1.0) } else { 0.0 };
    let jerk_lower = if enabled { (-cmd.jerk).max(1.0) } else { 0.0 };

    SignalFrame::new()
        .with("ComfortBandUpper", 0.0)
        .with("ComfortBandLower", 0.0)
        .with("JerkUpperLimit", jerk_upper)
        .with("JerkLowerLimit", jerk_lower)
        .with("ACCMode", scc14_acc_mode(enabled, cmd.gas_pressed))
        .with("ObjGap", lead_gap_bucket(cmd.lead_visible, cmd.lead_dist))
}

fn fca11_values(frame: u64) -> SignalFrame {
    idle_frame(&FCA11_IDLE)
        .with("CR_FCA_Alive", fca_alive_field(frame))
        .with("Supplemental_Counter", alive_counter(frame))
        .with("PAINT1_Status", 1)
        .with("FCA_DrvSetStatus", 1)
        // AEB disabled
        .with("FCA_Status", 1)
}

/// Build the per-cycle ACC command set: SCC11, SCC12, then SCC14 and FCA11
/// when the configuration calls for them
///
/// `previous_scc12` is the last SCC12 frame; outside radar-disable mode it is
/// the base the new command is written over.
pub fn create_acc_commands<P: MessagePacker + ?Sized>(
    packer: &P,
    config: &EncoderConfig,
    frame: u64,
    cmd: &AccCommand,
    previous_scc12: Option<&SignalFrame>,
) -> Result<Vec<CanFrame>> {
    let mut commands = Vec::with_capacity(4);

    commands.push(packer.pack("SCC11", 0, &scc11_values(config, frame, cmd))?);

    let scc12 = scc12_values(config, frame, cmd, previous_scc12);
    commands.push(pack_with_checksum(packer, "SCC12", 0, scc12, "CR_VSM_ChkSum", nibble_checksum)?);

    if config.sends_scc14() {
        commands.push(packer.pack("SCC14", 0, &scc14_values(cmd))?);
    }

    if config.radar_disable {
        let fca11 = fca11_values(frame);
        commands.push(pack_with_checksum(packer, "FCA11", 0, fca11, "CR_FCA_ChkSum", nibble_checksum)?);
    }

    log::debug!(
        "ACC commands frame {}: enabled={} accel={:.2} -> {} frames",
        frame,
        cmd.enabled,
        cmd.accel,
        commands.len()
    );

    Ok(commands)
}

/// SCC13 option advertisement, plus FCA12 in radar-disable mode
pub fn create_acc_opt<P: MessagePacker + ?Sized>(
    packer: &P,
    config: &EncoderConfig,
) -> Result<Vec<CanFrame>> {
    let mut commands = Vec::with_capacity(2);

    let scc13 = SignalFrame::new()
        .with("SCCDrvModeRValue", 2)
        .with("SCC_Equip", 1)
        .with("AebDrvSetStatus", 0)
        .with("Lead_Veh_Dep_Alert_USM", 2);
    commands.push(packer.pack("SCC13", 0, &scc13)?);

    if config.radar_disable {
        let fca12 = SignalFrame::new()
            .with("FCA_DrvSetState", 2)
            // AEB disabled
            .with("FCA_USM", 1);
        commands.push(packer.pack("FCA12", 0, &fca12)?);
    }

    Ok(commands)
}

/// FRT_RADAR11: announce that front-radar equipment is present
pub fn create_frt_radar_opt<P: MessagePacker + ?Sized>(packer: &P) -> Result<CanFrame> {
    let values = SignalFrame::new().with("CF_FCA_Equip_Front_Radar", 1);
    packer.pack("FRT_RADAR11", 0, &values)
}
