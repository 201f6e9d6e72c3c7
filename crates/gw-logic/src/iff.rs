//! IFF reflector — identity codes an object squawks to cooperative sensors.

use gw_wire::{IffSettings, UpdatePayload};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IffReflector {
    pub settings: IffSettings,
}

impl IffReflector {
    pub fn new(settings: IffSettings) -> Self {
        Self { settings: settings.clamped() }
    }

    /// Does this reflector squawk any of `codes`?
    pub fn squawks_any(&self, codes: &[String]) -> bool {
        self.settings.codes.iter().any(|c| codes.iter().any(|q| q == c))
    }

    pub fn apply(&mut self, payload: &UpdatePayload) -> bool {
        match payload {
            UpdatePayload::Iff(i) => {
                self.settings = i.clamped();
                true
            }
            _ => false,
        }
    }
}
