//! World clock: simulated time of night and the day counter.
//!
//! The clock only ever moves in whole simulated minutes. Everything it wants
//! the rest of the game to know about (time changed, day changed, night-end
//! warning, night-end) is queued as a [`ClockSignal`] and drained once per
//! frame by the clock plugin, which turns each signal into an event.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tuning::{ClockTuning, ScheduleEntry};

pub const MINUTES_IN_DAY: u16 = 1440;

// ═══════════════════════════════════════════════════════════════════════
// GAME TIME
// ═══════════════════════════════════════════════════════════════════════

/// Minutes since midnight, always in `0..MINUTES_IN_DAY`.
///
/// Serialized as an `"hh:mm"` string so tuning files and saves stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameTime(u16);

impl GameTime {
    pub const fn from_minutes(total: u16) -> Self {
        Self(total % MINUTES_IN_DAY)
    }

    pub const fn from_hm(hour: u16, minute: u16) -> Self {
        Self::from_minutes((hour % 24) * 60 + minute % 60)
    }

    pub fn hours(self) -> u16 {
        self.0 / 60
    }

    pub fn minutes(self) -> u16 {
        self.0 % 60
    }

    pub fn total_minutes(self) -> u16 {
        self.0
    }

    /// 0.0 at midnight, approaching 1.0 at 23:59.
    pub fn fraction_of_day(self) -> f32 {
        self.0 as f32 / MINUTES_IN_DAY as f32
    }

    /// Wrapped addition.
    pub fn plus_minutes(self, minutes: u16) -> Self {
        Self::from_minutes(((self.0 as u32 + minutes as u32) % MINUTES_IN_DAY as u32) as u16)
    }

    /// Forward distance from `self` to `later`, wrapping through midnight.
    pub fn minutes_until(self, later: GameTime) -> u16 {
        (later.0 + MINUTES_IN_DAY - self.0) % MINUTES_IN_DAY
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl From<GameTime> for String {
    fn from(time: GameTime) -> Self {
        time.to_string()
    }
}

impl TryFrom<String> for GameTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (h, m) = value
            .split_once(':')
            .ok_or_else(|| format!("expected hh:mm, got '{}'", value))?;
        let hour: u16 = h
            .trim()
            .parse()
            .map_err(|e| format!("bad hour in '{}': {}", value, e))?;
        let minute: u16 = m
            .trim()
            .parse()
            .map_err(|e| format!("bad minute in '{}': {}", value, e))?;
        if hour >= 24 || minute >= 60 {
            return Err(format!("time '{}' is out of range", value));
        }
        Ok(Self::from_hm(hour, minute))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SIGNALS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    TimeChanged(GameTime),
    DayChanged(u32),
    NightEndWarning { minutes_left: u16 },
    NightEnd,
}

/// Persisted part of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub time: GameTime,
    pub day: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD CLOCK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct WorldClock {
    time: GameTime,
    day: u32,
    paused: bool,
    night_end_notified: bool,
    warning_notified: bool,
    /// Real seconds not yet converted into a tick.
    elapsed_real_seconds: f32,
    minute_length: f32,
    days_in_month: u32,
    night_start: GameTime,
    night_end: GameTime,
    warning_lead_minutes: u16,
    signals: Vec<ClockSignal>,
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(&ClockTuning::default())
    }
}

impl WorldClock {
    /// A fresh clock at the start of night one.
    pub fn new(tuning: &ClockTuning) -> Self {
        Self {
            time: tuning.night_start,
            day: 1,
            paused: false,
            night_end_notified: false,
            warning_notified: false,
            elapsed_real_seconds: 0.0,
            minute_length: (tuning.day_length_seconds / MINUTES_IN_DAY as f32).max(0.001),
            days_in_month: tuning.days_in_month.max(1),
            night_start: tuning.night_start,
            night_end: tuning.night_end,
            warning_lead_minutes: tuning.warning_lead_minutes,
            signals: Vec::new(),
        }
    }

    pub fn time(&self) -> GameTime {
        self.time
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn night_end_notified(&self) -> bool {
        self.night_end_notified
    }

    pub fn minute_length(&self) -> f32 {
        self.minute_length
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn night_start(&self) -> GameTime {
        self.night_start
    }

    pub fn night_end(&self) -> GameTime {
        self.night_end
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            time: self.time,
            day: self.day,
        }
    }

    /// Advance one simulated minute unless paused. Returns whether time moved.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }

        self.time = self.time.plus_minutes(1);
        self.signals.push(ClockSignal::TimeChanged(self.time));

        if self.night_end_notified {
            return true;
        }

        let minutes_left = self.time.minutes_until(self.night_end);
        if !self.warning_notified
            && self.warning_lead_minutes > 0
            && minutes_left == self.warning_lead_minutes
        {
            self.warning_notified = true;
            self.signals
                .push(ClockSignal::NightEndWarning { minutes_left });
        }

        if self.time == self.night_end {
            self.night_end_notified = true;
            self.paused = true;
            self.signals.push(ClockSignal::NightEnd);
        }

        true
    }

    /// Feed real seconds into the tick loop. The loop keeps re-arming while
    /// paused; paused ticks simply do nothing. Returns minutes advanced.
    pub fn advance_real_time(&mut self, delta_seconds: f32) -> u32 {
        self.elapsed_real_seconds += delta_seconds.max(0.0);

        let mut advanced = 0;
        while self.elapsed_real_seconds >= self.minute_length {
            self.elapsed_real_seconds -= self.minute_length;
            if self.tick() {
                advanced += 1;
            }
        }
        advanced
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Hard overwrite used by loading. Always re-broadcasts time and day.
    ///
    /// A time outside the night counts as night-end already reached: the
    /// clock comes back paused and `NightEnd` is queued again.
    pub fn set_time_and_day(&mut self, time: GameTime, day: u32) {
        self.time = time;
        self.day = day.clamp(1, self.days_in_month);
        self.elapsed_real_seconds = 0.0;
        self.broadcast_all();

        if self.is_night(time) {
            self.night_end_notified = false;
            self.warning_notified = false;
            self.paused = false;
        } else {
            self.night_end_notified = true;
            self.warning_notified = true;
            self.paused = true;
            self.signals.push(ClockSignal::NightEnd);
        }
    }

    /// Inside `[night_start, night_end)`, wrapping through midnight.
    pub fn is_night(&self, time: GameTime) -> bool {
        self.night_start.minutes_until(time) < self.night_start.minutes_until(self.night_end)
    }

    /// Back to the start of night and on to the next day (wrapping the month).
    pub fn reset_and_advance_day(&mut self) {
        self.time = self.night_start;
        self.day = if self.day >= self.days_in_month {
            1
        } else {
            self.day + 1
        };
        self.night_end_notified = false;
        self.warning_notified = false;
        self.paused = false;
        self.elapsed_real_seconds = 0.0;
        self.broadcast_all();
    }

    /// Resume after night-end without declaring night-end again.
    pub fn continue_after_night_end(&mut self) {
        self.paused = false;
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn drain_signals(&mut self) -> Vec<ClockSignal> {
        std::mem::take(&mut self.signals)
    }

    fn broadcast_all(&mut self) {
        self.signals.push(ClockSignal::TimeChanged(self.time));
        self.signals.push(ClockSignal::DayChanged(self.day));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCHEDULE TABLE
// ═══════════════════════════════════════════════════════════════════════

/// Fixed `(hour, minute) → action` table, built once from tuning.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldSchedule {
    entries: Vec<ScheduleEntry>,
}

impl WorldSchedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Every action bound to exactly `time`, in table order.
    pub fn actions_at(&self, time: GameTime) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.hour == time.hours() && e.minute == time.minutes())
            .map(|e| e.action.as_str())
    }
}
