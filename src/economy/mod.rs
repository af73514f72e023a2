//! Economy domain: gold, the harbour fish market and boat upgrades.
//!
//! All cross-domain communication goes through `crate::shared::*` events and resources.

use bevy::prelude::*;
use crate::shared::*;

pub mod gold;
pub mod market;
pub mod upgrades;

pub use gold::{apply_gold_changes, EconomyStats};
pub use market::{handle_sell_requests, sell_catch_on_input};
pub use upgrades::{handle_upgrade_requests, request_upgrade_on_input};

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EconomyStats>();

        // Market and shipyard only trade in harbour.
        app.add_systems(
            Update,
            (
                sell_catch_on_input,
                handle_sell_requests,
                request_upgrade_on_input,
                handle_upgrade_requests,
            )
                .chain()
                .before(apply_gold_changes)
                .run_if(in_state(GameState::Harbour)),
        );

        // Gold change events can arrive from any domain at any time.
        app.add_systems(Update, apply_gold_changes);
    }
}
