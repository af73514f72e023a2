mod hud;

use bevy::prelude::*;

pub use hud::{clock_line, forecast_line, HudClock, HudMessage};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudClock>()
            .init_resource::<HudMessage>();

        // ─── HUD: always present, reads broadcasts in every state ───
        app.add_systems(Startup, hud::spawn_hud);
        app.add_systems(
            Update,
            (
                hud::update_clock_display,
                hud::update_health_display,
                hud::update_gold_display,
                hud::update_forecast_display,
                hud::collect_hud_messages,
                hud::update_message_display,
                hud::update_hint_display,
            )
                .chain(),
        );
    }
}
