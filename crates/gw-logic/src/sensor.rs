//! Directable sensor view — operator-adjustable sensor settings.

use gw_wire::{SensorSettings, UpdatePayload};

/// Holds the adjustable state of one directable sensor.
///
/// The server instance is authoritative: incoming settings are clamped to
/// hardware limits before being stored, and the stored (clamped) value is
/// what gets rebroadcast.  Client instances mirror whatever the server says.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorView {
    pub settings: SensorSettings,
}

impl SensorView {
    pub fn new(settings: SensorSettings) -> Self {
        Self { settings: settings.clamped() }
    }

    /// Merge an incoming update.  Always applies; the clamp is the veto.
    pub fn apply(&mut self, payload: &UpdatePayload) -> bool {
        match payload {
            UpdatePayload::Sensor(s) => {
                self.settings = s.clamped();
                true
            }
            _ => false,
        }
    }
}
