//! Installation validation logic.

use crate::schema::{InstallationDef, LawDef, ThermostatDef};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_installation(installation: &InstallationDef) -> Result<(), ValidationError> {
    if installation.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: installation.version,
        });
    }

    validate_thermostat(&installation.thermostat)?;
    validate_law(&installation.law)?;

    if installation.zones.is_empty() {
        return Err(ValidationError::Missing {
            field: "zones".to_string(),
        });
    }

    let mut zone_ids = HashSet::new();
    let mut entity_ids = HashSet::new();
    entity_ids.insert(installation.thermostat.entity_id.as_str());

    for zone in &installation.zones {
        if zone.id.trim().is_empty() {
            return Err(ValidationError::Missing {
                field: "zones[].id".to_string(),
            });
        }
        if !zone_ids.insert(zone.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: zone.id.clone(),
                context: "zones".to_string(),
            });
        }
        for entity in [&zone.cover_entity_id, &zone.sensor_entity_id] {
            if entity.trim().is_empty() {
                return Err(ValidationError::Missing {
                    field: format!("zone '{}' entity id", zone.id),
                });
            }
            if !entity_ids.insert(entity.as_str()) {
                return Err(ValidationError::DuplicateId {
                    id: entity.clone(),
                    context: format!("entities of zone '{}'", zone.id),
                });
            }
        }
    }

    Ok(())
}

fn validate_thermostat(thermostat: &ThermostatDef) -> Result<(), ValidationError> {
    if thermostat.entity_id.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "thermostat.entity_id".to_string(),
        });
    }
    for (field, value) in [
        ("thermostat.min_temp", thermostat.min_temp),
        ("thermostat.max_temp", thermostat.max_temp),
    ] {
        if !value.is_finite() {
            return Err(invalid(field, value, "must be finite"));
        }
    }
    if thermostat.min_temp >= thermostat.max_temp {
        return Err(invalid(
            "thermostat.min_temp",
            thermostat.min_temp,
            "must be less than max_temp",
        ));
    }
    if !(thermostat.target_temp_step > 0.0 && thermostat.target_temp_step.is_finite()) {
        return Err(invalid(
            "thermostat.target_temp_step",
            thermostat.target_temp_step,
            "must be positive",
        ));
    }
    Ok(())
}

fn validate_law(law: &LawDef) -> Result<(), ValidationError> {
    if !(law.horizon_s > 0.0 && law.horizon_s.is_finite()) {
        return Err(invalid("law.horizon_s", law.horizon_s, "must be positive"));
    }
    if !(law.gain > 0.0 && law.gain.is_finite()) {
        return Err(invalid("law.gain", law.gain, "must be positive"));
    }
    Ok(())
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
