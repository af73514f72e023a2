mod shared;
mod config;
mod input;
mod clock;
mod data;
mod boat;
mod fishing;
mod hazards;
mod salvage;
mod voyage;
mod economy;
mod save;
mod world;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Nightcatch".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<ItemRegistry>()
        .init_resource::<FishRegistry>()
        .init_resource::<Inventory>()
        .init_resource::<PlayerEconomy>()
        .init_resource::<BoatUpgrades>()
        .init_resource::<VoyageState>()
        .init_resource::<StormForecast>()
        .init_resource::<GameRng>()
        .init_resource::<PlayerInput>()
        // Clock events
        .add_event::<TimeChangedEvent>()
        .add_event::<DayChangedEvent>()
        .add_event::<NightEndWarningEvent>()
        .add_event::<NightEndEvent>()
        .add_event::<ScheduleFiredEvent>()
        // Sea events
        .add_event::<FishingOutcomeEvent>()
        .add_event::<BoatHealthChangedEvent>()
        .add_event::<BoatWreckedEvent>()
        .add_event::<DisasterWarningEvent>()
        .add_event::<LightningStrikeEvent>()
        .add_event::<SpawnBigWaveEvent>()
        .add_event::<ItemCollectedEvent>()
        // Harbour and persistence events
        .add_event::<GoldChangeEvent>()
        .add_event::<SellItemEvent>()
        .add_event::<UpgradeRequestEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>()
        // Tuning must exist before any other plugin builds
        .add_plugins(config::ConfigPlugin)
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(boat::BoatPlugin)
        .add_plugins(fishing::FishingPlugin)
        .add_plugins(hazards::HazardPlugin)
        .add_plugins(salvage::SalvagePlugin)
        .add_plugins(voyage::VoyagePlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
