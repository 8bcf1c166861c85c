//! MDPS12: steering motor status relayed to the camera

use crate::builders::pack_with_checksum;
use crate::checksum::{byte_sum, message_counter};
use crate::config::EncoderConfig;
use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};

/// Re-emit the previous MDPS12 frame with torque-intervention flags cleared
pub fn create_mdps12<P: MessagePacker + ?Sized>(
    packer: &P,
    config: &EncoderConfig,
    frame: u64,
    previous: &SignalFrame,
) -> Result<CanFrame> {
    let overlay = SignalFrame::new()
        .with("CF_Mdps_ToiActive", 0)
        .with("CF_Mdps_ToiUnavail", 1)
        .with("CF_Mdps_MsgCount2", message_counter(frame));

    let values = SignalFrame::merge(previous, &overlay);
    pack_with_checksum(packer, "MDPS12", config.mdps_bus, values, "CF_Mdps_Chksum2", byte_sum)
}
