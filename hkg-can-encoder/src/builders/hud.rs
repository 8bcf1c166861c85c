//! LFAHDA_MFC: lane-following / highway-drive-assist cluster icons

use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};
use serde::{Deserialize, Serialize};

/// Signals of LFAHDA_MFC the stateless builder leaves at zero
const LFAHDA_MFC_IDLE: [&str; 7] = [
    "HDA_USM",
    "HDA_Chime",
    "HDA_Icon_Wheel",
    "HDA_LdwSysState",
    "HDA_VSetReq",
    "HDA_SysWarning",
    "LFA_USM",
];

/// Stateless LFAHDA_MFC from the enabled/active/warning triple
///
/// `warning` values: 0 no message, 1 switching to HDA, 2 switching to SCC,
/// 3 LFA error, 4 check HDA, 5 keep hands on wheel (orange), 6 (red).
pub fn create_lfahda_mfc<P: MessagePacker + ?Sized>(
    packer: &P,
    enabled: bool,
    active: u8,
    warning: u8,
) -> Result<CanFrame> {
    let mut values: SignalFrame = LFAHDA_MFC_IDLE.iter().map(|&name| (name, 0.into())).collect();
    values.set("LFA_Icon_State", if enabled { 2 } else { 0 });
    values.set("HDA_Active", active > 0);
    values.set("HDA_Icon_State", if active > 0 { 2 } else { 0 });
    values.set("LFA_SysWarning", warning);

    packer.pack("LFAHDA_MFC", 0, &values)
}

/// HUD state for the stateful LFAHDA_MFC builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdaCommand {
    /// Assist level; above 1 lights the HDA icon and chimes
    pub active: u8,
    /// Stock cruise (ACC) engaged
    pub acc_enabled: bool,
    pub left_lane: bool,
    pub right_lane: bool,
}

/// Stateful LFAHDA_MFC on top of the previous LFAHDA_MFC frame
pub fn create_hda_mfc<P: MessagePacker + ?Sized>(
    packer: &P,
    cmd: &HdaCommand,
    previous: &SignalFrame,
) -> Result<CanFrame> {
    let ldw_sys_state = i64::from(cmd.left_lane) + 2 * i64::from(cmd.right_lane);
    let lit = cmd.active > 1;

    let overlay = SignalFrame::new()
        .with("HDA_LdwSysState", ldw_sys_state)
        .with("HDA_USM", 2)
        .with("HDA_VSetReq", 100)
        .with("HDA_Icon_Wheel", lit && cmd.acc_enabled)
        .with("HDA_Icon_State", if lit { 2 } else { 0 })
        .with("HDA_Chime", lit);

    packer.pack("LFAHDA_MFC", 0, &SignalFrame::merge(previous, &overlay))
}
