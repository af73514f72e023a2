//! Harbour market: turns the catch and any salvage in the hold into gold.

use bevy::prelude::*;
use crate::shared::*;

use super::gold::EconomyStats;

/// [E] in harbour queues a sale for every item in the hold.
pub fn sell_catch_on_input(
    input: Res<PlayerInput>,
    inventory: Res<Inventory>,
    items: Res<ItemRegistry>,
    mut sell_writer: EventWriter<SellItemEvent>,
) {
    if !input.sell_catch {
        return;
    }

    let mut queued = 0;
    for item_id in inventory.item_ids() {
        if items.get(&item_id).is_none() {
            continue;
        }
        let quantity = inventory.count(&item_id).min(u8::MAX as u32) as u8;
        sell_writer.send(SellItemEvent { item_id, quantity });
        queued += 1;
    }

    if queued == 0 {
        info!("[Economy] Nothing in the hold to sell");
    }
}

pub fn handle_sell_requests(
    mut sell_events: EventReader<SellItemEvent>,
    mut inventory: ResMut<Inventory>,
    items: Res<ItemRegistry>,
    mut stats: ResMut<EconomyStats>,
    mut gold_writer: EventWriter<GoldChangeEvent>,
) {
    for ev in sell_events.read() {
        let Some(item_def) = items.get(&ev.item_id) else {
            warn!("[Economy] Sell failed: unknown item '{}'", ev.item_id);
            continue;
        };

        let quantity = ev.quantity.max(1);
        let removed = inventory.try_remove(&ev.item_id, quantity);
        if removed == 0 {
            warn!(
                "[Economy] Sell failed: no '{}' in the hold",
                ev.item_id
            );
            continue;
        }
        if removed < quantity {
            warn!(
                "[Economy] Partial sell: only removed {} of {}",
                removed, quantity
            );
        }

        let total = item_def.sell_price.saturating_mul(removed as u32);
        if item_def.category == ItemCategory::Fish {
            stats.total_fish_sold = stats.total_fish_sold.saturating_add(removed as u64);
        }
        gold_writer.send(GoldChangeEvent {
            amount: total.min(i32::MAX as u32) as i32,
            reason: format!("Sold {} x {}", removed, item_def.name),
        });
        info!(
            "[Economy] Sold {} x '{}' for {}g",
            removed, ev.item_id, total
        );
    }
}
