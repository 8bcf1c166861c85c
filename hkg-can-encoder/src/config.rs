//! Encoder configuration types
//!
//! Per-session settings: which vehicle we talk to, which optional messages it
//! carries and where the routed frames go.

use crate::vehicle::VehicleId;
use serde::{Deserialize, Serialize};

/// Configuration for an encoding session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Target vehicle
    pub vehicle: VehicleId,

    /// Stock front radar is silenced; we impersonate its SCC/FCA traffic
    #[serde(default)]
    pub radar_disable: bool,

    /// Force the LDWS option display to its maximum value
    #[serde(default)]
    pub ldws_opt: bool,

    /// Vehicle carries the SCC14 longitudinal-limits message
    #[serde(default)]
    pub has_scc14: bool,

    /// Bus for LKAS11 (default: 0)
    #[serde(default)]
    pub lkas_bus: u8,

    /// Bus for MDPS12 (default: 2, the camera side)
    #[serde(default = "default_mdps_bus")]
    pub mdps_bus: u8,

    /// Bus for CLU11 (default: 0)
    #[serde(default)]
    pub clu_bus: u8,
}

fn default_mdps_bus() -> u8 {
    2
}

impl EncoderConfig {
    /// Create a configuration with default settings for a vehicle
    pub fn new(vehicle: VehicleId) -> Self {
        Self {
            vehicle,
            radar_disable: false,
            ldws_opt: false,
            has_scc14: false,
            lkas_bus: 0,
            mdps_bus: default_mdps_bus(),
            clu_bus: 0,
        }
    }

    /// Builder method: enable radar-disable mode
    pub fn with_radar_disable(mut self, enabled: bool) -> Self {
        self.radar_disable = enabled;
        self
    }

    /// Builder method: force the LDWS option display
    pub fn with_ldws_opt(mut self, enabled: bool) -> Self {
        self.ldws_opt = enabled;
        self
    }

    /// Builder method: declare that the vehicle carries SCC14
    pub fn with_scc14(mut self, present: bool) -> Self {
        self.has_scc14 = present;
        self
    }

    /// Builder method: set the LKAS11 bus
    pub fn with_lkas_bus(mut self, bus: u8) -> Self {
        self.lkas_bus = bus;
        self
    }

    /// Builder method: set the MDPS12 bus
    pub fn with_mdps_bus(mut self, bus: u8) -> Self {
        self.mdps_bus = bus;
        self
    }

    /// Builder method: set the CLU11 bus
    pub fn with_clu_bus(mut self, bus: u8) -> Self {
        self.clu_bus = bus;
        self
    }

    /// SCC14 is sent when the car has it or when we stand in for the radar
    pub fn sends_scc14(&self) -> bool {
        self.has_scc14 || self.radar_disable
    }
}
