//! Routing of raw host state changes to zone controllers.
//!
//! The host publishes entity updates for the shared thermostat and for every
//! zone's damper and temperature sensor. The router translates each update
//! into typed [`ZoneEvent`]s, hands them to the owning zones and forwards any
//! resulting command to the actuator.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zf_core::ZoneId;

use crate::actuator::DamperActuator;
use crate::error::{ControlError, ControlResult};
use crate::event::{RestoredZone, SetDamperPosition, ZoneEvent};
use crate::state::PositionReport;
use crate::zone::ZoneController;

/// Host states that carry no information for any entity.
const IGNORED_STATES: [&str; 2] = ["unknown", "unavailable"];

/// Attributes of a host entity relevant to zone control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostAttributes {
    /// Cover position in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<f64>,
}

/// One entity update as published by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostStateChange {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: HostAttributes,
    pub last_changed: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityRole {
    Cover,
    Sensor,
}

/// Owns every zone controller and the entity wiring between them and the host.
#[derive(Debug)]
pub struct ZoneRouter {
    thermostat_entity_id: String,
    zones: BTreeMap<ZoneId, ZoneController>,
    wiring: HashMap<String, (ZoneId, EntityRole)>,
}

impl ZoneRouter {
    pub fn new(thermostat_entity_id: impl Into<String>) -> Self {
        Self {
            thermostat_entity_id: thermostat_entity_id.into(),
            zones: BTreeMap::new(),
            wiring: HashMap::new(),
        }
    }

    pub fn thermostat_entity_id(&self) -> &str {
        &self.thermostat_entity_id
    }

    /// Register a zone with its damper and sensor entities.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::DuplicateEntity`] if an entity is already wired
    /// (or is the thermostat), and [`ControlError::InvalidArg`] if the zone id
    /// is taken.
    pub fn add_zone(
        &mut self,
        controller: ZoneController,
        cover_entity_id: impl Into<String>,
        sensor_entity_id: impl Into<String>,
    ) -> ControlResult<()> {
        let cover = cover_entity_id.into();
        let sensor = sensor_entity_id.into();
        if self.zones.contains_key(&controller.id()) {
            return Err(ControlError::InvalidArg {
                what: "zone id already registered",
            });
        }
        for entity in [&cover, &sensor] {
            if self.wiring.contains_key(entity) || *entity == self.thermostat_entity_id {
                return Err(ControlError::DuplicateEntity {
                    entity_id: entity.clone(),
                });
            }
        }
        if cover == sensor {
            return Err(ControlError::DuplicateEntity { entity_id: cover });
        }

        let id = controller.id();
        self.wiring.insert(cover, (id, EntityRole::Cover));
        self.wiring.insert(sensor, (id, EntityRole::Sensor));
        self.zones.insert(id, controller);
        Ok(())
    }

    pub fn zone(&self, id: ZoneId) -> Option<&ZoneController> {
        self.zones.get(&id)
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneController> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Translate a host update into zone events.
    ///
    /// Thermostat updates fan out to every zone. Unknown entities and the
    /// `unknown`/`unavailable` states produce nothing.
    pub fn translate(&self, change: &HostStateChange) -> Vec<(ZoneId, ZoneEvent)> {
        if IGNORED_STATES.contains(&change.state.as_str()) {
            return Vec::new();
        }

        if change.entity_id == self.thermostat_entity_id {
            return self
                .zones
                .keys()
                .map(|&id| {
                    (
                        id,
                        ZoneEvent::ThermostatChanged {
                            operating_mode: change.state.clone(),
                        },
                    )
                })
                .collect();
        }

        let Some(&(id, role)) = self.wiring.get(&change.entity_id) else {
            return Vec::new();
        };
        let event = match role {
            EntityRole::Cover => ZoneEvent::DamperPositionChanged {
                position: PositionReport::from_host(&change.state, change.attributes.current_position),
            },
            EntityRole::Sensor => ZoneEvent::TemperatureSampleChanged {
                value: change.state.clone(),
                timestamp: change.last_changed,
            },
        };
        vec![(id, event)]
    }

    /// Apply one event to one zone and forward its command, if any.
    ///
    /// Recoverable zone errors are logged and swallowed: the event is dropped
    /// and the zone keeps running. Only an unknown zone is an error.
    pub fn dispatch(
        &mut self,
        id: ZoneId,
        event: ZoneEvent,
        actuator: &mut dyn DamperActuator,
    ) -> ControlResult<Option<SetDamperPosition>> {
        let zone = self
            .zones
            .get_mut(&id)
            .ok_or_else(|| ControlError::UnknownZone { zone: id.to_string() })?;

        match zone.handle(event) {
            Ok(Some(command)) => {
                actuator.set_position(command);
                Ok(Some(command))
            }
            Ok(None) => Ok(None),
            Err(err @ ControlError::UnrecognizedMode { .. }) => {
                warn!(zone = %zone.name(), error = %err, "thermostat not heating or cooling, zone suspended");
                Ok(None)
            }
            Err(err) if err.is_recoverable() => {
                debug!(zone = %zone.name(), error = %err, "event dropped");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Route a host update to every affected zone.
    ///
    /// Returns the commands sent to the actuator.
    pub fn on_host_state_change(
        &mut self,
        change: &HostStateChange,
        actuator: &mut dyn DamperActuator,
    ) -> ControlResult<Vec<SetDamperPosition>> {
        let mut commands = Vec::new();
        for (id, event) in self.translate(change) {
            if let Some(command) = self.dispatch(id, event, actuator)? {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    /// Apply a restored mode/target to a zone without evaluating.
    pub fn restore(&mut self, id: ZoneId, restored: &RestoredZone) -> ControlResult<()> {
        let zone = self
            .zones
            .get_mut(&id)
            .ok_or_else(|| ControlError::UnknownZone { zone: id.to_string() })?;
        zone.restore(restored)
    }
}
