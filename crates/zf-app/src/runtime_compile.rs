//! Compile an installation definition into live zone controllers.

use std::collections::BTreeMap;

use zf_controls::{DamperLaw, ZoneController, ZoneLimits, ZoneMode, ZoneRouter};
use zf_core::{ZoneId, s};
use zf_project::{InstallationDef, ZoneModeDef};

use crate::error::{AppError, AppResult};

/// Running controllers plus the mapping between configured zone ids and
/// runtime ids.
#[derive(Debug)]
pub struct ZoneRuntime {
    pub router: ZoneRouter,
    ids: BTreeMap<String, ZoneId>,
    names: BTreeMap<ZoneId, String>,
}

impl ZoneRuntime {
    /// Look up the runtime id of a configured zone.
    pub fn zone_id(&self, zone: &str) -> AppResult<ZoneId> {
        self.ids
            .get(zone)
            .copied()
            .ok_or_else(|| AppError::ZoneNotFound(zone.to_string()))
    }

    /// Configured id of a runtime zone.
    pub fn zone_key(&self, id: ZoneId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Configured zone ids in configuration order.
    pub fn zone_keys(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }
}

pub fn zone_mode(def: ZoneModeDef) -> ZoneMode {
    match def {
        ZoneModeDef::Off => ZoneMode::Off,
        ZoneModeDef::Auto => ZoneMode::Auto,
    }
}

pub fn zone_mode_def(mode: ZoneMode) -> ZoneModeDef {
    match mode {
        ZoneMode::Off => ZoneModeDef::Off,
        ZoneMode::Auto => ZoneModeDef::Auto,
    }
}

/// Build the router and one controller per configured zone.
///
/// Zones start `Off` with the damper assumed fully open.
pub fn compile_installation(installation: &InstallationDef) -> AppResult<ZoneRuntime> {
    crate::project_service::validate_installation(installation)?;

    let thermostat = &installation.thermostat;
    let limits = ZoneLimits::new(
        thermostat.min_temp,
        thermostat.max_temp,
        thermostat.target_temp_step,
    )
    .map_err(|e| AppError::Compile(e.to_string()))?;
    let law = DamperLaw::new(s(installation.law.horizon_s), installation.law.gain)
        .map_err(|e| AppError::Compile(e.to_string()))?;

    let mut router = ZoneRouter::new(thermostat.entity_id.clone());
    let mut ids = BTreeMap::new();
    let mut names = BTreeMap::new();
    for (index, zone) in installation.zones.iter().enumerate() {
        let index = u32::try_from(index)
            .map_err(|_| AppError::Compile("too many zones".to_string()))?;
        let id = ZoneId::from_index(index);
        let controller = ZoneController::new(id, zone.display_name(), limits, law);
        router
            .add_zone(controller, &zone.cover_entity_id, &zone.sensor_entity_id)
            .map_err(|e| AppError::Compile(e.to_string()))?;
        ids.insert(zone.id.clone(), id);
        names.insert(id, zone.id.clone());
    }

    tracing::info!(
        zones = router.len(),
        thermostat = %thermostat.entity_id,
        "installation compiled"
    );
    Ok(ZoneRuntime { router, ids, names })
}
