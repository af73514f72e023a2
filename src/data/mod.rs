//! Data layer: populates the registries when the game boots.
//!
//! Runs in OnEnter(GameState::Loading). The save plugin finishes loading and
//! moves the game on to the harbour.

mod fish;
mod items;

use bevy::prelude::*;
use crate::shared::*;

pub use fish::populate_fish;
pub use items::populate_items;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

fn load_all_data(
    mut item_registry: ResMut<ItemRegistry>,
    mut fish_registry: ResMut<FishRegistry>,
) {
    info!("DataPlugin: populating registries…");

    items::populate_items(&mut item_registry);
    info!("  Items loaded: {}", item_registry.items.len());

    fish::populate_fish(&mut fish_registry);
    info!("  Fish loaded: {}", fish_registry.species.len());

    for species in &fish_registry.species {
        if item_registry.get(&species.reward_item).is_none() {
            warn!(
                "DataPlugin: fish '{}' rewards unknown item '{}'",
                species.id, species.reward_item
            );
        }
    }
}
