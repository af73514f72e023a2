//! Shared components, resources, events, and states for Nightcatch.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

pub mod clock;
pub mod delay;
pub mod tuning;

pub use clock::*;
pub use delay::*;
pub use tuning::*;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    /// Docked: market and upgrades, time frozen.
    Harbour,
    /// Out at night: the clock runs, fishing and hazards are live.
    Sea,
}

// ═══════════════════════════════════════════════════════════════════════
// PORTS
// ═══════════════════════════════════════════════════════════════════════

/// What the fishing and hazard code may ask of the boat.
pub trait BoatAgent {
    fn is_moving(&self) -> bool;
    fn set_movement_enabled(&mut self, enabled: bool);
    fn take_damage(&mut self, amount: f32, flash: bool);
    fn heal(&mut self, amount: f32);
    fn apply_knockback(&mut self, direction: Vec2, force: f32);
}

pub trait InventoryPort {
    /// False when the item is unknown or there is no room for it.
    fn add_item(&mut self, item_id: &str, amount: u8) -> bool;
}

pub trait EconomyPort {
    fn add_gold(&mut self, amount: i64);
    fn current_gold(&self) -> u32;
}

// ═══════════════════════════════════════════════════════════════════════
// BOAT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct Knockback {
    pub velocity: Vec2,
    pub timer: Timer,
}

/// The player's boat. Lives for the whole session; hidden while docked.
#[derive(Component, Debug, Clone)]
pub struct Boat {
    pub hp: f32,
    pub max_hp: f32,
    pub move_speed: f32,
    /// Steering velocity in world units per second (knockback excluded).
    pub velocity: Vec2,
    pub knockback: Option<Knockback>,
    pub flash: Option<Timer>,
    pub slowdown: Option<Timer>,
    movement_enabled: bool,
    health_dirty: bool,
    knockback_duration: f32,
    flash_duration: f32,
    hit_slowdown: f32,
    hit_slowdown_seconds: f32,
}

impl Boat {
    pub fn new(tuning: &BoatTuning) -> Self {
        Self {
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            move_speed: tuning.move_speed,
            velocity: Vec2::ZERO,
            knockback: None,
            flash: None,
            slowdown: None,
            movement_enabled: true,
            // Report the starting HP once.
            health_dirty: true,
            knockback_duration: tuning.knockback_duration,
            flash_duration: tuning.flash_duration,
            hit_slowdown: tuning.hit_slowdown,
            hit_slowdown_seconds: tuning.hit_slowdown_seconds,
        }
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn is_wrecked(&self) -> bool {
        self.hp <= 0.0
    }

    /// Current steering speed with any hit slowdown applied.
    pub fn effective_speed(&self) -> f32 {
        if self.slowdown.is_some() {
            self.move_speed * self.hit_slowdown
        } else {
            self.move_speed
        }
    }

    /// Full repair, used when the boat is towed back to harbour.
    pub fn repair(&mut self) {
        self.hp = self.max_hp;
        self.velocity = Vec2::ZERO;
        self.knockback = None;
        self.flash = None;
        self.slowdown = None;
        self.health_dirty = true;
    }

    pub fn raise_max_hp(&mut self, amount: f32) {
        self.max_hp += amount.max(0.0);
        self.heal(amount);
    }

    /// Returns true once after every HP change.
    pub fn take_health_report(&mut self) -> bool {
        std::mem::take(&mut self.health_dirty)
    }
}

impl BoatAgent for Boat {
    fn is_moving(&self) -> bool {
        self.movement_enabled && self.velocity.length_squared() > 1e-4
    }

    fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
        if !enabled {
            self.velocity = Vec2::ZERO;
        }
    }

    fn take_damage(&mut self, amount: f32, flash: bool) {
        let amount = amount.max(0.0);
        if amount == 0.0 || self.is_wrecked() {
            return;
        }
        self.hp = (self.hp - amount).max(0.0);
        self.health_dirty = true;
        self.slowdown = Some(Timer::from_seconds(self.hit_slowdown_seconds, TimerMode::Once));
        if flash {
            self.flash = Some(Timer::from_seconds(self.flash_duration, TimerMode::Once));
        }
    }

    fn heal(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        if amount == 0.0 {
            return;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
        self.health_dirty = true;
    }

    fn apply_knockback(&mut self, direction: Vec2, force: f32) {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || force <= 0.0 {
            return;
        }
        self.knockback = Some(Knockback {
            velocity: direction * force,
            timer: Timer::from_seconds(self.knockback_duration, TimerMode::Once),
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type in the game.
pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Fish,
    Salvage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub sell_price: u32,
    pub stack_size: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item_id: ItemId,
    pub quantity: u8,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub slots: Vec<Option<InventorySlot>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; INVENTORY_SLOTS],
        }
    }
}

impl Inventory {
    /// Try to add an item. Returns the quantity that couldn't fit.
    pub fn try_add(&mut self, item_id: &str, quantity: u8, max_stack: u8) -> u8 {
        let max_stack = max_stack.max(1);
        let mut remaining = quantity;

        // Top up existing stacks first
        for slot in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if slot.item_id == item_id && slot.quantity < max_stack {
                let add = remaining.min(max_stack - slot.quantity);
                slot.quantity += add;
                remaining -= add;
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let add = remaining.min(max_stack);
                *slot = Some(InventorySlot {
                    item_id: item_id.to_string(),
                    quantity: add,
                });
                remaining -= add;
            }
        }

        remaining
    }

    /// Remove quantity of an item. Returns how many were actually removed.
    pub fn try_remove(&mut self, item_id: &str, quantity: u8) -> u8 {
        let mut remaining = quantity;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if let Some(ref mut s) = slot {
                if s.item_id == item_id {
                    let remove = remaining.min(s.quantity);
                    s.quantity -= remove;
                    remaining -= remove;
                    if s.quantity == 0 {
                        *slot = None;
                    }
                }
            }
        }
        quantity - remaining
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity as u32)
            .sum()
    }

    /// Distinct item ids currently held, in slot order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = Vec::new();
        for slot in self.slots.iter().flatten() {
            if !ids.contains(&slot.item_id) {
                ids.push(slot.item_id.clone());
            }
        }
        ids
    }

    /// Free space for `item_id`, counting partial stacks and empty slots.
    pub fn room_for(&self, item_id: &str, max_stack: u8) -> u32 {
        let max_stack = max_stack.max(1) as u32;
        self.slots
            .iter()
            .map(|slot| match slot {
                None => max_stack,
                Some(s) if s.item_id == item_id => max_stack.saturating_sub(s.quantity as u32),
                Some(_) => 0,
            })
            .sum()
    }
}

/// Inventory seen through the registry, so stack limits and unknown items
/// are handled the same way for every caller.
pub struct ItemStore<'a> {
    pub inventory: &'a mut Inventory,
    pub registry: &'a ItemRegistry,
}

impl InventoryPort for ItemStore<'_> {
    fn add_item(&mut self, item_id: &str, amount: u8) -> bool {
        let Some(def) = self.registry.get(item_id) else {
            return false;
        };
        if amount == 0 || self.inventory.room_for(item_id, def.stack_size) < amount as u32 {
            return false;
        }
        self.inventory.try_add(item_id, amount, def.stack_size) == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REGISTRIES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemId, ItemDef>,
}

impl ItemRegistry {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSpecies {
    pub id: String,
    pub name: String,
    /// Kilograms.
    pub weight: f32,
    /// Centimetres.
    pub size: f32,
    /// Struggle difficulty, 0.0..=1.0.
    pub strength: f32,
    pub reward_item: ItemId,
}

/// Ordered so a uniform draw with a seeded RNG is reproducible.
#[derive(Resource, Debug, Clone, Default)]
pub struct FishRegistry {
    pub species: Vec<FishSpecies>,
}

impl FishRegistry {
    pub fn get(&self, id: &str) -> Option<&FishSpecies> {
        self.species.iter().find(|f| f.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ECONOMY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerEconomy {
    pub gold: u32,
}

/// Format a gold amount as a display string (e.g. "1,234g").
pub fn format_gold(amount: u32) -> String {
    let s = amount.to_string();
    let mut result = String::new();
    let digits: Vec<char> = s.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.push('g');
    result
}

impl EconomyPort for PlayerEconomy {
    fn add_gold(&mut self, amount: i64) {
        let next = (self.gold as i64 + amount).clamp(0, u32::MAX as i64);
        self.gold = next as u32;
    }

    fn current_gold(&self) -> u32 {
        self.gold
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatUpgrades {
    pub speed_level: u32,
    pub health_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Speed,
    Health,
}

// ═══════════════════════════════════════════════════════════════════════
// VOYAGE
// ═══════════════════════════════════════════════════════════════════════

/// Night-end prompt state. While the prompt is open the boat cannot steer
/// and no fishing attempt may run.
#[derive(Resource, Debug, Clone, Default)]
pub struct VoyageState {
    pub prompt_open: bool,
    /// The player chose to stay out after night-end.
    pub stayed_past_night_end: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════

/// Tonight's weather, rolled once per day. Storms only gather on a night
/// forecast as stormy.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StormForecast {
    /// Day this forecast was rolled for; 0 before the first roll.
    pub day: u32,
    pub stormy: bool,
}

impl StormForecast {
    pub fn label(&self) -> &'static str {
        if self.stormy {
            "THUNDERSTORM"
        } else {
            "NORMAL"
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RANDOMNESS
// ═══════════════════════════════════════════════════════════════════════

/// The one random source for gameplay rolls. Seed it in tests.
#[derive(Resource, Debug)]
pub struct GameRng(pub StdRng);

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SEA GEOMETRY
// ═══════════════════════════════════════════════════════════════════════

/// Moves `from` toward `to` by at most `max_step` without overshooting.
pub fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        to
    } else {
        from + offset / distance * max_step
    }
}

/// Point at a random angle and a distance within `min..max` from `origin`.
pub fn random_point_around(origin: Vec2, min: f32, max: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = if max > min { rng.gen_range(min..max) } else { min };
    origin + Vec2::from_angle(angle) * distance
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Game actions for the current frame. Filled by the input plugin, read by
/// everyone else; tests write it directly.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub cast_pressed: bool,
    pub cast_released: bool,
    pub reel_held: bool,
    pub reel_pressed: bool,
    /// -1.0 (left) .. 1.0 (right).
    pub balance_axis: f32,
    pub go_home: bool,
    pub stay_out: bool,
    pub set_sail: bool,
    pub sell_catch: bool,
    pub upgrade: Option<UpgradeKind>,
    pub quicksave: bool,
    pub quickload: bool,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Disabled,
    Harbour,
    Sailing,
    Prompt,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeChangedEvent {
    pub time: GameTime,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayChangedEvent {
    pub day: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightEndWarningEvent {
    pub minutes_left: u16,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightEndEvent;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFiredEvent {
    pub action: String,
    pub time: GameTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    AgentMoving,
    NoAgent,
    WeakThrow,
    NoBite,
    MissedBite,
    LineSnapped,
    FishLost,
    NoFish,
    MissingReward,
    Suspended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FishingOutcome {
    Caught { species: String, stored: bool },
    Cancelled { reason: CancelReason },
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct FishingOutcomeEvent(pub FishingOutcome);

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BoatHealthChangedEvent {
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct BoatWreckedEvent;

#[derive(Event, Debug, Clone, Copy)]
pub struct DisasterWarningEvent;

#[derive(Event, Debug, Clone, Copy)]
pub struct LightningStrikeEvent {
    pub position: Vec2,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnBigWaveEvent;

#[derive(Event, Debug, Clone)]
pub struct ItemCollectedEvent {
    pub item_id: ItemId,
    pub amount: u8,
}

#[derive(Event, Debug, Clone)]
pub struct GoldChangeEvent {
    pub amount: i32, // positive = gain, negative = spend
    pub reason: String,
}

#[derive(Event, Debug, Clone)]
pub struct SellItemEvent {
    pub item_id: ItemId,
    pub quantity: u8,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct UpgradeRequestEvent {
    pub kind: UpgradeKind,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone, Copy)]
pub struct LoadRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const PIXELS_PER_UNIT: f32 = 32.0;
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const INVENTORY_SLOTS: usize = 16;
