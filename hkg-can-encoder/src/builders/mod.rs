//! Frame value builders
//!
//! One builder per outgoing message type. Each builder computes a fresh
//! signal mapping from the command state (carrying forward the caller's
//! previous frame where the message needs it), packs it and, where the
//! message is checksummed, re-packs it with the checksum filled in.

pub mod cluster;
pub mod hud;
pub mod lkas;
pub mod mdps;
pub mod scc;

pub use cluster::create_clu11;
pub use hud::{create_hda_mfc, create_lfahda_mfc, HdaCommand};
pub use lkas::{create_lkas11, LkasCommand};
pub use mdps::create_mdps12;
pub use scc::{
    acc_mode, create_acc_commands, create_acc_opt, create_frt_radar_opt, lead_gap_bucket,
    AccCommand,
};

use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};

/// Pack `values` with `field` zeroed, checksum the bytes, then pack again
/// with the checksum in place.
pub(crate) fn pack_with_checksum<P, F>(
    packer: &P,
    message: &str,
    bus: u8,
    mut values: SignalFrame,
    field: &str,
    checksum: F,
) -> Result<CanFrame>
where
    P: MessagePacker + ?Sized,
    F: Fn(&[u8]) -> u8,
{
    values.set(field, 0);
    let zeroed = packer.pack(message, bus, &values)?;

    let sum = checksum(&zeroed.data);
    log::trace!("{} {} = {}", message, field, sum);

    values.set(field, sum);
    packer.pack(message, bus, &values)
}
