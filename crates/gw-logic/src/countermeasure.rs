//! Countermeasure dispenser view — arm state and salvo settings.

use gw_wire::{CountermeasureSettings, UpdatePayload};

/// Holds the adjustable state of one countermeasure dispenser.  Release
/// scheduling itself is host physics; this logic only synchronizes what the
/// operator set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountermeasureView {
    pub settings: CountermeasureSettings,
}

impl CountermeasureView {
    pub fn new(settings: CountermeasureSettings) -> Self {
        Self { settings: settings.clamped() }
    }

    pub fn apply(&mut self, payload: &UpdatePayload) -> bool {
        match payload {
            UpdatePayload::Countermeasure(c) => {
                self.settings = c.clamped();
                true
            }
            _ => false,
        }
    }
}
