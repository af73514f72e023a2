use bevy::prelude::*;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;

/// Everything that survives between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub version: u32,
    pub time: GameTime,
    pub day: u32,
    pub boat_hp: f32,
    pub boat_max_hp: f32,
    pub move_speed: f32,
    pub inventory: Inventory,
    pub gold: u32,
    pub speed_level: u32,
    pub health_level: u32,
}

/// Persistence port. `Ok(None)` means no save exists yet.
pub trait SaveStore: Send + Sync {
    fn load(&self) -> Result<Option<GameData>, String>;
    fn save(&self, data: &GameData) -> Result<(), String>;
}

#[derive(Resource)]
pub struct SaveBackend(pub Box<dyn SaveStore>);

impl Default for SaveBackend {
    #[cfg(not(target_arch = "wasm32"))]
    fn default() -> Self {
        Self(Box::new(JsonFileStore::new(saves_directory().join("gamedata.json"))))
    }

    #[cfg(target_arch = "wasm32")]
    fn default() -> Self {
        Self(Box::new(BrowserStore::new("nightcatch.gamedata")))
    }
}

fn decode(json: &str) -> Result<GameData, String> {
    let data: GameData =
        serde_json::from_str(json).map_err(|e| format!("Deserialization failed: {}", e))?;
    if data.version != SAVE_VERSION {
        warn!(
            "[Save] Save has version {} but current version is {}. Attempting to load anyway.",
            data.version, SAVE_VERSION
        );
    }
    Ok(data)
}

fn encode(data: &GameData) -> Result<String, String> {
    serde_json::to_string_pretty(data).map_err(|e| format!("Serialization failed: {}", e))
}

// ═══════════════════════════════════════════════════════════════════════
// STORES
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

/// One JSON file on disk, written through a temp file and a rename.
#[cfg(not(target_arch = "wasm32"))]
pub struct JsonFileStore {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SaveStore for JsonFileStore {
    fn load(&self) -> Result<Option<GameData>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read failed for {}: {}", self.path.display(), e))?;
        decode(&json).map(Some)
    }

    fn save(&self, data: &GameData) -> Result<(), String> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Could not create saves directory: {}", e))?;
        }
        let json = encode(data)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| format!("Rename failed: {}", e))?;
        Ok(())
    }
}

/// Browser localStorage under a single key.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or_else(|| "No browser window".to_string())?
            .local_storage()
            .map_err(|e| format!("localStorage unavailable: {:?}", e))?
            .ok_or_else(|| "localStorage unavailable".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for BrowserStore {
    fn load(&self) -> Result<Option<GameData>, String> {
        let json = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| format!("Read failed: {:?}", e))?;
        match json {
            Some(json) => decode(&json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, data: &GameData) -> Result<(), String> {
        let json = encode(data)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|e| format!("Write failed: {:?}", e))
    }
}

/// In-memory store. Clones share the same slot, so a test can keep one
/// handle and give the other to the app.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn with_json(json: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(json.to_string()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<GameData>, String> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| "Save slot lock poisoned".to_string())?;
        match slot.as_deref() {
            Some(json) => decode(json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, data: &GameData) -> Result<(), String> {
        let json = encode(data)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| "Save slot lock poisoned".to_string())?;
        *slot = Some(json);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        // Tests install their own backend before adding the plugin.
        if !app.world().contains_resource::<SaveBackend>() {
            app.init_resource::<SaveBackend>();
        }

        app.add_systems(
            Update,
            load_saved_game.run_if(in_state(GameState::Loading)),
        )
        .add_systems(
            Update,
            quicksave_keybind
                .run_if(in_state(GameState::Harbour).or(in_state(GameState::Sea))),
        )
        // After gameplay has applied this frame's gold and upgrades.
        .add_systems(
            PostUpdate,
            (handle_save_request, handle_load_request)
                .chain()
                .run_if(in_state(GameState::Harbour).or(in_state(GameState::Sea))),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CAPTURE / APPLY
// ═══════════════════════════════════════════════════════════════════════

pub fn capture_game_data(
    clock: &WorldClock,
    boat: Option<&Boat>,
    inventory: &Inventory,
    economy: &PlayerEconomy,
    upgrades: &BoatUpgrades,
    tuning: &BoatTuning,
) -> GameData {
    let (boat_hp, boat_max_hp, move_speed) = match boat {
        Some(boat) => (boat.hp, boat.max_hp, boat.move_speed),
        None => (tuning.max_hp, tuning.max_hp, tuning.move_speed),
    };
    GameData {
        version: SAVE_VERSION,
        time: clock.time(),
        day: clock.day(),
        boat_hp,
        boat_max_hp,
        move_speed,
        inventory: inventory.clone(),
        gold: economy.gold,
        speed_level: upgrades.speed_level,
        health_level: upgrades.health_level,
    }
}

pub fn apply_game_data(
    data: GameData,
    clock: &mut WorldClock,
    boat: Option<&mut Boat>,
    inventory: &mut Inventory,
    economy: &mut PlayerEconomy,
    upgrades: &mut BoatUpgrades,
) {
    clock.set_time_and_day(data.time, data.day);
    if let Some(boat) = boat {
        boat.max_hp = data.boat_max_hp.max(1.0);
        boat.move_speed = data.move_speed;
        boat.repair();
        boat.hp = data.boat_hp.clamp(0.0, boat.max_hp);
    }
    *inventory = data.inventory;
    inventory.slots.resize(INVENTORY_SLOTS, None);
    economy.gold = data.gold;
    upgrades.speed_level = data.speed_level;
    upgrades.health_level = data.health_level;
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Reads the save once while in `Loading`, then opens the harbour.
fn load_saved_game(
    backend: Res<SaveBackend>,
    mut clock: ResMut<WorldClock>,
    mut inventory: ResMut<Inventory>,
    mut economy: ResMut<PlayerEconomy>,
    mut upgrades: ResMut<BoatUpgrades>,
    mut boats: Query<&mut Boat>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match backend.0.load() {
        Ok(Some(data)) => {
            let day = data.day;
            let mut boat = boats.get_single_mut().ok();
            apply_game_data(
                data,
                &mut clock,
                boat.as_deref_mut(),
                &mut inventory,
                &mut economy,
                &mut upgrades,
            );
            info!("[Save] Loaded save, day {}", day);
            complete_events.send(LoadCompleteEvent {
                success: true,
                error_message: None,
            });
        }
        Ok(None) => {
            info!("[Save] No save found, starting fresh");
        }
        Err(e) => {
            warn!("[Save] Load FAILED: {}. Starting fresh.", e);
            complete_events.send(LoadCompleteEvent {
                success: false,
                error_message: Some(e),
            });
        }
    }
    next_state.set(GameState::Harbour);
}

fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    backend: Res<SaveBackend>,
    clock: Res<WorldClock>,
    inventory: Res<Inventory>,
    economy: Res<PlayerEconomy>,
    upgrades: Res<BoatUpgrades>,
    tuning: Res<BoatTuning>,
    boats: Query<&Boat>,
) {
    // Several requests in one frame collapse into one write.
    if save_events.read().count() == 0 {
        return;
    }

    let data = capture_game_data(
        &clock,
        boats.get_single().ok(),
        &inventory,
        &economy,
        &upgrades,
        &tuning,
    );
    match backend.0.save(&data) {
        Ok(()) => {
            info!("[Save] Saved day {} at {}", data.day, data.time);
            complete_events.send(SaveCompleteEvent {
                success: true,
                error_message: None,
            });
        }
        Err(e) => {
            warn!("[Save] Save FAILED: {}", e);
            complete_events.send(SaveCompleteEvent {
                success: false,
                error_message: Some(e),
            });
        }
    }
}

fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    backend: Res<SaveBackend>,
    mut clock: ResMut<WorldClock>,
    mut inventory: ResMut<Inventory>,
    mut economy: ResMut<PlayerEconomy>,
    mut upgrades: ResMut<BoatUpgrades>,
    mut boats: Query<&mut Boat>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if load_events.read().count() == 0 {
        return;
    }

    match backend.0.load() {
        Ok(Some(data)) => {
            let mut boat = boats.get_single_mut().ok();
            apply_game_data(
                data,
                &mut clock,
                boat.as_deref_mut(),
                &mut inventory,
                &mut economy,
                &mut upgrades,
            );
            info!("[Save] Load succeeded");
            complete_events.send(LoadCompleteEvent {
                success: true,
                error_message: None,
            });
            next_state.set(GameState::Harbour);
        }
        Ok(None) => {
            info!("[Save] Nothing to load yet");
            complete_events.send(LoadCompleteEvent {
                success: false,
                error_message: Some("No save found".to_string()),
            });
        }
        Err(e) => {
            warn!("[Save] Load FAILED: {}", e);
            complete_events.send(LoadCompleteEvent {
                success: false,
                error_message: Some(e),
            });
        }
    }
}

/// F5 = quicksave, F9 = quickload. Once the night is over nothing can be
/// saved until the boat is back in harbour.
fn quicksave_keybind(
    player_input: Res<PlayerInput>,
    voyage: Res<VoyageState>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    mut load_writer: EventWriter<LoadRequestEvent>,
) {
    if player_input.quicksave {
        if voyage.prompt_open || voyage.stayed_past_night_end {
            info!("[Save] Quicksave unavailable after night-end");
        } else {
            info!("[Save] F5 quicksave");
            save_writer.send(SaveRequestEvent);
        }
    }
    if player_input.quickload {
        info!("[Save] F9 quickload");
        load_writer.send(LoadRequestEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameData {
        let mut inventory = Inventory::default();
        inventory.try_add("tuna", 2, 20);
        GameData {
            version: SAVE_VERSION,
            time: GameTime::from_hm(23, 45),
            day: 4,
            boat_hp: 12.0,
            boat_max_hp: 40.0,
            move_speed: 5.5,
            inventory,
            gold: 320,
            speed_level: 1,
            health_level: 1,
        }
    }

    #[test]
    fn test_memory_store_starts_empty() {
        assert_eq!(MemoryStore::default().load(), Ok(None));
    }

    #[test]
    fn test_time_is_stored_as_clock_text() {
        let store = MemoryStore::default();
        store.save(&sample()).unwrap();
        let raw = store.raw().unwrap();
        assert!(raw.contains("\"23:45\""), "{}", raw);
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_broken_save_is_an_error() {
        let store = MemoryStore::with_json("{ not json");
        assert!(store.load().is_err());
    }

    #[test]
    fn test_file_store_missing_file_is_no_save() {
        let dir = std::env::temp_dir().join(format!("nightcatch-missing-{}", std::process::id()));
        let store = JsonFileStore::new(dir.join("gamedata.json"));
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn test_file_store_writes_and_reads_back() {
        let dir = std::env::temp_dir().join(format!("nightcatch-save-{}", std::process::id()));
        let store = JsonFileStore::new(dir.join("gamedata.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(!dir.join("gamedata.json.tmp").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_apply_restores_boat_and_clamps_day() {
        let mut clock = WorldClock::default();
        let mut boat = Boat::new(&BoatTuning::default());
        let mut inventory = Inventory::default();
        let mut economy = PlayerEconomy::default();
        let mut upgrades = BoatUpgrades::default();

        let mut data = sample();
        data.day = 99;
        apply_game_data(
            data,
            &mut clock,
            Some(&mut boat),
            &mut inventory,
            &mut economy,
            &mut upgrades,
        );

        assert_eq!(clock.day(), clock.days_in_month());
        assert_eq!(clock.time(), GameTime::from_hm(23, 45));
        assert_eq!(boat.hp, 12.0);
        assert_eq!(boat.max_hp, 40.0);
        assert_eq!(inventory.count("tuna"), 2);
        assert_eq!(economy.gold, 320);
        assert_eq!(upgrades.speed_level, 1);
    }
}
