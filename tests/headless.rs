//! Headless integration tests for Nightcatch.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register the gameplay
//! plugins (skipping world rendering and the HUD), and drive the game by
//! writing `PlayerInput` directly instead of pressing keys.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use nightcatch::boat::BoatPlugin;
use nightcatch::clock::ClockPlugin;
use nightcatch::config::insert_tuning;
use nightcatch::data::DataPlugin;
use nightcatch::economy::{EconomyPlugin, EconomyStats};
use nightcatch::fishing::{FishingPhase, FishingPlugin, FishingSession};
use nightcatch::hazards::{BigWave, HazardPlugin, Shark, Strike};
use nightcatch::salvage::{Collectible, SalvagePlugin};
use nightcatch::save::{capture_game_data, MemoryStore, SaveBackend, SavePlugin, SaveStore};
use nightcatch::shared::*;
use nightcatch::voyage::VoyagePlugin;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Every frame advances 0.2 real seconds.
const FRAME: Duration = Duration::from_millis(200);

#[derive(Resource, Default)]
struct CapturedOutcomes(Vec<FishingOutcome>);

fn capture_outcomes(
    mut events: EventReader<FishingOutcomeEvent>,
    mut captured: ResMut<CapturedOutcomes>,
) {
    for ev in events.read() {
        captured.0.push(ev.0.clone());
    }
}

/// Builds a headless app with all shared resources and events registered
/// and the gameplay plugins installed. `store` backs the save plugin.
fn build_test_app(store: MemoryStore) -> App {
    let mut tuning = GameTuning::default();
    // One simulated minute per 0.1 real seconds.
    tuning.clock.day_length_seconds = 144.0;
    // Nothing wanders into the scene unless a test asks for it.
    tuning.shark.max_sharks = 0;
    tuning.salvage.max_in_scene = 0;
    build_test_app_with(store, tuning)
}

fn build_test_app_with(store: MemoryStore, tuning: GameTuning) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<ItemRegistry>()
        .init_resource::<FishRegistry>()
        .init_resource::<Inventory>()
        .init_resource::<PlayerEconomy>()
        .init_resource::<BoatUpgrades>()
        .init_resource::<VoyageState>()
        .init_resource::<StormForecast>()
        .insert_resource(GameRng::seeded(7))
        .init_resource::<PlayerInput>();

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<TimeChangedEvent>()
        .add_event::<DayChangedEvent>()
        .add_event::<NightEndWarningEvent>()
        .add_event::<NightEndEvent>()
        .add_event::<ScheduleFiredEvent>()
        .add_event::<FishingOutcomeEvent>()
        .add_event::<BoatHealthChangedEvent>()
        .add_event::<BoatWreckedEvent>()
        .add_event::<DisasterWarningEvent>()
        .add_event::<LightningStrikeEvent>()
        .add_event::<SpawnBigWaveEvent>()
        .add_event::<ItemCollectedEvent>()
        .add_event::<GoldChangeEvent>()
        .add_event::<SellItemEvent>()
        .add_event::<UpgradeRequestEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>();

    // ── Tuning and plugins ───────────────────────────────────────────────
    insert_tuning(&mut app, tuning);
    app.insert_resource(SaveBackend(Box::new(store)));
    app.add_plugins((
        ClockPlugin,
        DataPlugin,
        BoatPlugin,
        FishingPlugin,
        HazardPlugin,
        SalvagePlugin,
        VoyagePlugin,
        EconomyPlugin,
        SavePlugin,
    ));

    app.init_resource::<CapturedOutcomes>()
        .add_systems(Last, capture_outcomes);

    app
}

/// Boots through `Loading` into the harbour.
fn boot_to_harbour(app: &mut App) {
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(current_state(app), GameState::Harbour);
}

fn set_sail(app: &mut App) {
    press(app, |input| input.set_sail = true);
    app.update();
    assert_eq!(current_state(app), GameState::Sea);
}

fn current_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// Writes one frame of input, runs the frame, then releases everything.
fn press(app: &mut App, write: impl FnOnce(&mut PlayerInput)) {
    write(&mut app.world_mut().resource_mut::<PlayerInput>());
    app.update();
    *app.world_mut().resource_mut::<PlayerInput>() = PlayerInput::default();
}

fn boat(app: &mut App) -> Boat {
    let mut query = app.world_mut().query::<&Boat>();
    query.single(app.world()).clone()
}

fn fishing_phase(app: &App) -> FishingPhase {
    app.world().resource::<FishingSession>().phase()
}

fn count<C: Component>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<(), With<C>>();
    query.iter(app.world()).count()
}

fn saved_game(store: &MemoryStore) -> Option<nightcatch::save::GameData> {
    store.load().ok().flatten()
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot and persistence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_reaches_harbour_with_registries() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);

    assert!(!app.world().resource::<ItemRegistry>().items.is_empty());
    assert!(!app.world().resource::<FishRegistry>().species.is_empty());

    let clock = app.world().resource::<WorldClock>();
    assert_eq!(clock.day(), 1);
    assert_eq!(clock.time(), GameTime::from_hm(21, 0));
}

#[test]
fn test_existing_save_is_applied_on_boot() {
    let store = MemoryStore::default();
    let mut clock = WorldClock::default();
    clock.set_time_and_day(GameTime::from_hm(21, 0), 4);
    let mut economy = PlayerEconomy::default();
    economy.gold = 275;
    let upgrades = BoatUpgrades {
        speed_level: 2,
        health_level: 0,
    };
    let data = capture_game_data(
        &clock,
        None,
        &Inventory::default(),
        &economy,
        &upgrades,
        &BoatTuning::default(),
    );
    store.save(&data).expect("seed save");

    let mut app = build_test_app(store);
    boot_to_harbour(&mut app);

    assert_eq!(app.world().resource::<WorldClock>().day(), 4);
    assert_eq!(app.world().resource::<PlayerEconomy>().gold, 275);
    assert_eq!(app.world().resource::<BoatUpgrades>().speed_level, 2);
}

#[test]
fn test_corrupt_save_still_boots_fresh() {
    let mut app = build_test_app(MemoryStore::with_json("{ not json"));
    boot_to_harbour(&mut app);

    assert_eq!(app.world().resource::<WorldClock>().day(), 1);
    assert_eq!(app.world().resource::<PlayerEconomy>().gold, 0);
}

#[test]
fn test_quicksave_writes_current_progress() {
    let store = MemoryStore::default();
    let mut app = build_test_app(store.clone());
    boot_to_harbour(&mut app);
    assert!(store.raw().is_none());

    app.world_mut().resource_mut::<PlayerEconomy>().gold = 42;
    press(&mut app, |input| input.quicksave = true);

    let saved = saved_game(&store).expect("quicksave should write a save");
    assert_eq!(saved.gold, 42);
    assert_eq!(saved.day, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock and voyage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_clock_is_frozen_in_harbour_and_runs_at_sea() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<WorldClock>().time(),
        GameTime::from_hm(21, 0),
        "harbour must not advance the clock"
    );

    set_sail(&mut app);
    for _ in 0..5 {
        app.update();
    }
    assert!(app.world().resource::<WorldClock>().time() > GameTime::from_hm(21, 0));
}

/// Sails out with the clock moved to just before night-end and runs frames
/// until the night-end prompt opens.
fn sail_until_night_end(app: &mut App) {
    set_sail(app);
    app.world_mut()
        .resource_mut::<WorldClock>()
        .set_time_and_day(GameTime::from_hm(2, 55), 1);

    for _ in 0..20 {
        app.update();
        if app.world().resource::<VoyageState>().prompt_open {
            break;
        }
    }
    assert!(app.world().resource::<VoyageState>().prompt_open);
}

#[test]
fn test_night_end_pauses_clock_and_opens_prompt() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    sail_until_night_end(&mut app);

    let clock = app.world().resource::<WorldClock>();
    assert!(clock.is_paused());
    assert!(clock.night_end_notified());
    assert_eq!(clock.time(), GameTime::from_hm(3, 0));

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<WorldClock>().time(),
        GameTime::from_hm(3, 0)
    );
}

#[test]
fn test_heading_home_advances_day_and_saves() {
    let store = MemoryStore::default();
    let mut app = build_test_app(store.clone());
    boot_to_harbour(&mut app);
    sail_until_night_end(&mut app);

    press(&mut app, |input| input.go_home = true);
    app.update();

    assert_eq!(current_state(&app), GameState::Harbour);
    let clock = app.world().resource::<WorldClock>();
    assert_eq!(clock.day(), 2);
    assert_eq!(clock.time(), GameTime::from_hm(21, 0));
    assert!(!clock.is_paused());

    let saved = saved_game(&store).expect("heading home should save");
    assert_eq!(saved.day, 2);
}

#[test]
fn test_staying_out_resumes_clock_without_second_night_end() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    sail_until_night_end(&mut app);

    press(&mut app, |input| input.stay_out = true);
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(current_state(&app), GameState::Sea);
    let voyage = app.world().resource::<VoyageState>();
    assert!(!voyage.prompt_open);
    assert!(voyage.stayed_past_night_end);
    assert!(app.world().resource::<WorldClock>().time() > GameTime::from_hm(3, 0));
}

#[test]
fn test_big_wave_only_spawns_after_staying_out() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    sail_until_night_end(&mut app);

    press(&mut app, |input| input.stay_out = true);
    // 03:00 to 03:10 plus some slack.
    for _ in 0..10 {
        app.update();
    }

    assert_eq!(count::<BigWave>(&mut app), 1);
}

#[test]
fn test_save_past_night_end_reopens_prompt_at_sea() {
    let store = MemoryStore::default();
    let mut clock = WorldClock::default();
    clock.set_time_and_day(GameTime::from_hm(3, 30), 2);
    let data = capture_game_data(
        &clock,
        None,
        &Inventory::default(),
        &PlayerEconomy::default(),
        &BoatUpgrades::default(),
        &BoatTuning::default(),
    );
    store.save(&data).expect("seed save");

    let mut app = build_test_app(store);
    boot_to_harbour(&mut app);
    {
        let clock = app.world().resource::<WorldClock>();
        assert!(clock.is_paused());
        assert!(clock.night_end_notified());
    }

    set_sail(&mut app);
    assert!(app.world().resource::<VoyageState>().prompt_open);
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<WorldClock>().time(),
        GameTime::from_hm(3, 30),
        "the clock must not run on toward a second night-end"
    );

    press(&mut app, |input| input.go_home = true);
    app.update();
    assert_eq!(current_state(&app), GameState::Harbour);
    assert_eq!(app.world().resource::<WorldClock>().day(), 3);
}

#[test]
fn test_quicksave_refused_once_the_night_is_over() {
    let store = MemoryStore::default();
    let mut app = build_test_app(store.clone());
    boot_to_harbour(&mut app);
    sail_until_night_end(&mut app);

    press(&mut app, |input| input.quicksave = true);
    app.update();
    assert!(store.raw().is_none(), "prompt open");

    press(&mut app, |input| input.stay_out = true);
    press(&mut app, |input| input.quicksave = true);
    app.update();
    assert!(store.raw().is_none(), "stayed out");
}

// ─────────────────────────────────────────────────────────────────────────────
// Hazards
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_strike_on_boat_hits_once_and_knocks_back() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);
    let start_hp = boat(&mut app).hp;
    let damage = DisasterTuning::default().strike_damage;

    app.world_mut().spawn((
        Strike {
            lifetime: Timer::from_seconds(4.0, TimerMode::Once),
            has_hit: false,
        },
        Transform::from_xyz(0.5, 0.0, 8.0),
    ));
    app.update();

    let hit = boat(&mut app);
    assert_eq!(hit.hp, start_hp - damage);
    let knockback = hit.knockback.expect("strike knocks the boat back");
    assert!(knockback.velocity.x < 0.0, "pushed away from the strike");

    for _ in 0..8 {
        app.update();
    }
    assert_eq!(boat(&mut app).hp, start_hp - damage, "a strike only hits once");
}

#[test]
fn test_big_wave_hits_boat_and_breaks() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);
    let start_hp = boat(&mut app).hp;

    app.world_mut().spawn((
        BigWave {
            speed: 6.0,
            damage: 10.0,
        },
        Transform::from_xyz(2.0, 0.0, 8.0),
    ));
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(count::<BigWave>(&mut app), 0);
    assert_eq!(boat(&mut app).hp, start_hp - 10.0);
}

#[test]
fn test_shark_rams_boat_and_is_gone() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);
    let start_hp = boat(&mut app).hp;
    let tuning = SharkTuning::default();

    app.world_mut().spawn((
        Shark::new(Vec2::new(1.5, 0.0), false, &tuning),
        Transform::from_xyz(1.5, 0.0, 8.0),
    ));
    app.update();

    assert_eq!(count::<Shark>(&mut app), 0);
    let hit = boat(&mut app);
    assert_eq!(hit.hp, start_hp - tuning.damage);
    assert!(hit.knockback.is_some());
}

#[test]
fn test_sharks_surface_at_sea_and_leave_with_the_boat() {
    let mut tuning = GameTuning::default();
    tuning.clock.day_length_seconds = 144.0;
    tuning.salvage.max_in_scene = 0;
    tuning.shark.max_sharks = 2;
    let mut app = build_test_app_with(MemoryStore::default(), tuning);
    boot_to_harbour(&mut app);
    assert_eq!(count::<Shark>(&mut app), 0);

    set_sail(&mut app);
    app.update();
    assert_eq!(count::<Shark>(&mut app), 1, "one shark right away, more later");

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Harbour);
    app.update();
    assert_eq!(count::<Shark>(&mut app), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Salvage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sailing_over_driftwood_stows_it() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);

    app.world_mut().spawn((
        Collectible {
            item_id: "driftwood".into(),
            amount: 1,
        },
        Transform::from_xyz(0.3, 0.0, 4.0),
    ));
    app.update();

    assert_eq!(app.world().resource::<Inventory>().count("driftwood"), 1);
    assert_eq!(count::<Collectible>(&mut app), 0);
}

#[test]
fn test_salvage_spawns_up_to_its_cap() {
    let mut tuning = GameTuning::default();
    tuning.clock.day_length_seconds = 144.0;
    tuning.shark.max_sharks = 0;
    tuning.salvage.max_in_scene = 2;
    tuning.salvage.spawn_interval = 0.2;
    let mut app = build_test_app_with(MemoryStore::default(), tuning);
    boot_to_harbour(&mut app);
    set_sail(&mut app);

    for _ in 0..6 {
        app.update();
    }
    assert_eq!(count::<Collectible>(&mut app), 2);
    assert_eq!(app.world().resource::<Inventory>().count("driftwood"), 0);

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Harbour);
    app.update();
    assert_eq!(count::<Collectible>(&mut app), 0);
}

#[test]
fn test_wreck_tows_boat_home_repaired() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);

    {
        let mut query = app.world_mut().query::<&mut Boat>();
        let mut boat = query.single_mut(app.world_mut());
        let hp = boat.hp;
        boat.take_damage(hp, true);
    }
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(current_state(&app), GameState::Harbour);
    assert_eq!(app.world().resource::<WorldClock>().day(), 2);
    let boat = boat(&mut app);
    assert_eq!(boat.hp, boat.max_hp);
}

// ─────────────────────────────────────────────────────────────────────────────
// Fishing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cast_locks_boat_steering() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);

    press(&mut app, |input| input.cast_pressed = true);

    assert_eq!(fishing_phase(&app), FishingPhase::Throwing);
    assert!(!boat(&mut app).movement_enabled());
}

#[test]
fn test_cast_in_harbour_is_ignored() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);

    press(&mut app, |input| input.cast_pressed = true);

    assert_eq!(fishing_phase(&app), FishingPhase::Idle);
}

#[test]
fn test_night_end_prompt_suspends_running_attempt() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);

    press(&mut app, |input| input.cast_pressed = true);
    assert_eq!(fishing_phase(&app), FishingPhase::Throwing);

    app.world_mut().resource_mut::<VoyageState>().prompt_open = true;
    app.update();

    assert_eq!(fishing_phase(&app), FishingPhase::Idle);
    assert!(boat(&mut app).movement_enabled());
    let outcomes = &app.world().resource::<CapturedOutcomes>().0;
    assert_eq!(
        outcomes.last(),
        Some(&FishingOutcome::Cancelled {
            reason: CancelReason::Suspended
        })
    );
}

#[test]
fn test_leaving_sea_abandons_attempt() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);
    set_sail(&mut app);

    press(&mut app, |input| input.cast_pressed = true);
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Harbour);
    app.update();

    assert_eq!(fishing_phase(&app), FishingPhase::Idle);
    assert_eq!(app.world().resource::<FishingSession>().pending_continuations(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Economy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_selling_catch_in_harbour_pays_out() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);

    let price = app
        .world()
        .resource::<ItemRegistry>()
        .get("mackerel")
        .map(|def| def.sell_price)
        .expect("mackerel is registered");
    app.world_mut()
        .resource_mut::<Inventory>()
        .try_add("mackerel", 3, 99);

    press(&mut app, |input| input.sell_catch = true);

    assert_eq!(app.world().resource::<Inventory>().count("mackerel"), 0);
    assert_eq!(app.world().resource::<PlayerEconomy>().gold, price * 3);
    assert_eq!(app.world().resource::<EconomyStats>().total_fish_sold, 3);
}

#[test]
fn test_salvage_sells_but_is_not_counted_as_fish() {
    let mut app = build_test_app(MemoryStore::default());
    boot_to_harbour(&mut app);

    let price = app
        .world()
        .resource::<ItemRegistry>()
        .get("driftwood")
        .map(|def| def.sell_price)
        .expect("driftwood is registered");
    app.world_mut()
        .resource_mut::<Inventory>()
        .try_add("driftwood", 2, 99);

    press(&mut app, |input| input.sell_catch = true);

    assert_eq!(app.world().resource::<Inventory>().count("driftwood"), 0);
    assert_eq!(app.world().resource::<PlayerEconomy>().gold, price * 2);
    assert_eq!(app.world().resource::<EconomyStats>().total_fish_sold, 0);
}

#[test]
fn test_upgrade_needs_enough_gold() {
    let store = MemoryStore::default();
    let mut app = build_test_app(store.clone());
    boot_to_harbour(&mut app);
    let base_speed = boat(&mut app).move_speed;

    press(&mut app, |input| input.upgrade = Some(UpgradeKind::Speed));
    assert_eq!(app.world().resource::<BoatUpgrades>().speed_level, 0);

    let cost = EconomyTuning::default().upgrade_cost(UpgradeKind::Speed, 0);
    app.world_mut().resource_mut::<PlayerEconomy>().gold = cost + 5;
    press(&mut app, |input| input.upgrade = Some(UpgradeKind::Speed));

    assert_eq!(app.world().resource::<BoatUpgrades>().speed_level, 1);
    assert_eq!(app.world().resource::<PlayerEconomy>().gold, 5);
    assert!(boat(&mut app).move_speed > base_speed);

    let saved = saved_game(&store).expect("upgrades are saved");
    assert_eq!(saved.speed_level, 1);
    assert_eq!(saved.gold, 5);
}
