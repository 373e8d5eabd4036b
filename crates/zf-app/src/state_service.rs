//! Persist and restore zone mode/target between runs.

use tracing::warn;
use zf_controls::RestoredZone;
use zf_project::{ZoneSnapshotDef, ZoneSnapshotFile};

use crate::error::AppResult;
use crate::runtime_compile::{ZoneRuntime, zone_mode, zone_mode_def};

/// Capture the current mode and target of every zone.
pub fn capture_snapshot(runtime: &ZoneRuntime) -> ZoneSnapshotFile {
    let zones = runtime
        .router
        .zones()
        .filter_map(|controller| {
            let key = runtime.zone_key(controller.id())?;
            let state = controller.state();
            Some(ZoneSnapshotDef {
                zone: key.to_string(),
                mode: zone_mode_def(state.mode),
                target_temperature: state.target_temperature,
            })
        })
        .collect();
    ZoneSnapshotFile { zones }
}

/// Restore zones from a snapshot without evaluating them.
///
/// Entries for zones no longer configured are skipped. Returns the number of
/// zones restored.
pub fn apply_snapshot(runtime: &mut ZoneRuntime, snapshot: &ZoneSnapshotFile) -> AppResult<usize> {
    let mut restored = 0;
    for entry in &snapshot.zones {
        let Ok(id) = runtime.zone_id(&entry.zone) else {
            warn!(zone = %entry.zone, "snapshot entry for unknown zone skipped");
            continue;
        };
        runtime.router.restore(
            id,
            &RestoredZone {
                mode: zone_mode(entry.mode),
                target_temperature: entry.target_temperature,
            },
        )?;
        restored += 1;
    }
    Ok(restored)
}
