//! Search director — drives idle sensors through a sector scan.

use gw_core::EntityId;
use gw_wire::{SearchSettings, UpdatePayload};

use crate::context::TickContext;
use crate::effect::Effect;

/// Commands a set of sensors to sweep a sector while nothing tracks them.
///
/// Sensors given to a search director must not also be controlled by a
/// tracker; the two would fight over the mount.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDirector {
    authority: bool,
    pub settings: SearchSettings,
    sensors: Vec<EntityId>,
}

impl SearchDirector {
    pub fn authority(settings: SearchSettings, sensors: Vec<EntityId>) -> Self {
        Self { authority: true, settings: settings.clamped(), sensors }
    }

    pub fn mirror(settings: SearchSettings) -> Self {
        Self { authority: false, settings, sensors: Vec::new() }
    }

    #[inline]
    pub fn is_authority(&self) -> bool {
        self.authority
    }

    #[inline]
    pub fn sensors(&self) -> &[EntityId] {
        &self.sensors
    }

    pub fn tick(&mut self, _ctx: &TickContext<'_>) -> Vec<Effect> {
        if !self.authority || !self.settings.enabled {
            return Vec::new();
        }
        self.sensors
            .iter()
            .map(|&sensor| Effect::Aim {
                sensor,
                command: gw_world::AimCommand::Sweep {
                    center_rad: self.settings.center_azimuth_rad,
                    half_angle_rad: self.settings.sweep_half_angle_rad,
                },
            })
            .collect()
    }

    pub fn apply(&mut self, payload: &UpdatePayload) -> bool {
        match payload {
            UpdatePayload::Search(s) => {
                self.settings = s.clamped();
                true
            }
            _ => false,
        }
    }
}
