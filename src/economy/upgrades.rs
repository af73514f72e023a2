//! Boat upgrades bought in harbour. Each level costs more than the last.

use bevy::prelude::*;
use crate::shared::*;

pub fn level_of(upgrades: &BoatUpgrades, kind: UpgradeKind) -> u32 {
    match kind {
        UpgradeKind::Speed => upgrades.speed_level,
        UpgradeKind::Health => upgrades.health_level,
    }
}

/// [1]/[2] in harbour.
pub fn request_upgrade_on_input(
    input: Res<PlayerInput>,
    mut upgrade_writer: EventWriter<UpgradeRequestEvent>,
) {
    if let Some(kind) = input.upgrade {
        upgrade_writer.send(UpgradeRequestEvent { kind });
    }
}

pub fn handle_upgrade_requests(
    mut events: EventReader<UpgradeRequestEvent>,
    tuning: Res<EconomyTuning>,
    economy: Res<PlayerEconomy>,
    mut upgrades: ResMut<BoatUpgrades>,
    mut boats: Query<&mut Boat>,
    mut gold_writer: EventWriter<GoldChangeEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    // Gold is applied later in the frame, so spend against a local balance.
    let mut available = economy.current_gold();

    for ev in events.read() {
        let level = level_of(&upgrades, ev.kind);
        let cost = tuning.upgrade_cost(ev.kind, level);
        if available < cost {
            info!(
                "[Economy] {:?} upgrade costs {}g, only {}g available",
                ev.kind, cost, available
            );
            continue;
        }
        let Ok(mut boat) = boats.get_single_mut() else {
            warn!("[Economy] No boat to upgrade");
            continue;
        };

        match ev.kind {
            UpgradeKind::Speed => {
                boat.move_speed += tuning.speed_upgrade_amount;
                upgrades.speed_level += 1;
            }
            UpgradeKind::Health => {
                boat.raise_max_hp(tuning.health_upgrade_amount);
                upgrades.health_level += 1;
            }
        }
        available -= cost;

        gold_writer.send(GoldChangeEvent {
            amount: -(cost.min(i32::MAX as u32) as i32),
            reason: format!("{:?} upgrade level {}", ev.kind, level + 1),
        });
        save_writer.send(SaveRequestEvent);
        info!(
            "[Economy] Bought {:?} upgrade level {} for {}g",
            ev.kind,
            level + 1,
            cost
        );
    }
}
