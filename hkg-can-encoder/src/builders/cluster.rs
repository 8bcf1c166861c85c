//! CLU11: cruise button presses and cluster speed

use crate::checksum::increment_alive;
use crate::config::EncoderConfig;
use crate::packer::MessagePacker;
use crate::types::{CanFrame, Result, SignalFrame};

/// Forward a cruise button code on top of the previous CLU11 frame
///
/// The alive counter continues from the previous frame, not from the
/// control frame index.
pub fn create_clu11<P: MessagePacker + ?Sized>(
    packer: &P,
    config: &EncoderConfig,
    previous: &SignalFrame,
    button: u8,
    speed: f64,
) -> Result<CanFrame> {
    let alive = previous.require_integer("CLU11", "CF_Clu_AliveCnt1")?;

    let overlay = SignalFrame::new()
        .with("CF_Clu_CruiseSwState", button)
        .with("CF_Clu_Vanz", speed)
        .with("CF_Clu_AliveCnt1", increment_alive(alive));

    log::debug!("CLU11 button={} speed={} alive={}", button, speed, increment_alive(alive));

    packer.pack("CLU11", config.clu_bus, &SignalFrame::merge(previous, &overlay))
}
