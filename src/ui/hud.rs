use bevy::prelude::*;
use crate::shared::*;

const MESSAGE_SECONDS: f32 = 3.0;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS / RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudClockText;

#[derive(Component)]
pub struct HudForecastText;

#[derive(Component)]
pub struct HudHealthText;

#[derive(Component)]
pub struct HudHealthFill;

#[derive(Component)]
pub struct HudGoldText;

/// Centre line for warnings, outcomes and the night-end prompt.
#[derive(Component)]
pub struct HudMessageText;

/// Key hints for the current state, bottom-left.
#[derive(Component)]
pub struct HudHintText;

/// Clock as last broadcast. Seeded from the clock once, then only events
/// move it.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HudClock {
    pub time: GameTime,
    pub day: u32,
}

#[derive(Resource, Debug, Default)]
pub struct HudMessage {
    pub text: String,
    pub timer: Option<Timer>,
}

impl HudMessage {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.timer = Some(Timer::from_seconds(MESSAGE_SECONDS, TimerMode::Once));
    }
}

pub fn clock_line(time: GameTime, day: u32) -> String {
    format!("Day {} - {}", day, time)
}

pub fn forecast_line(forecast: &StormForecast) -> String {
    format!("Forecast: {}", forecast.label())
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN HUD
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands, clock: Res<WorldClock>, mut hud_clock: ResMut<HudClock>) {
    hud_clock.time = clock.time();
    hud_clock.day = clock.day();

    // Root container, full screen overlay
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
        ))
        .with_children(|parent| {
            // ─── TOP BAR ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(40.0),
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                ))
                .with_children(|top_bar| {
                    top_bar.spawn((
                        HudClockText,
                        Text::new(clock_line(hud_clock.time, hud_clock.day)),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));

                    top_bar.spawn((
                        HudForecastText,
                        Text::new(""),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.85, 0.95)),
                    ));

                    // Right group: hull + gold
                    top_bar
                        .spawn(Node {
                            flex_direction: FlexDirection::Row,
                            align_items: AlignItems::Center,
                            column_gap: Val::Px(16.0),
                            ..default()
                        })
                        .with_children(|right| {
                            right.spawn((
                                HudHealthText,
                                Text::new("Hull"),
                                TextFont {
                                    font_size: 16.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                            ));

                            right
                                .spawn((
                                    Node {
                                        width: Val::Px(120.0),
                                        height: Val::Px(14.0),
                                        border: UiRect::all(Val::Px(1.0)),
                                        ..default()
                                    },
                                    BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.9)),
                                    BorderColor(Color::srgba(0.6, 0.6, 0.6, 0.8)),
                                ))
                                .with_children(|bar| {
                                    bar.spawn((
                                        HudHealthFill,
                                        Node {
                                            width: Val::Percent(100.0),
                                            height: Val::Percent(100.0),
                                            ..default()
                                        },
                                        BackgroundColor(Color::srgb(0.2, 0.85, 0.3)),
                                    ));
                                });

                            right.spawn((
                                HudGoldText,
                                Text::new(format_gold(0)),
                                TextFont {
                                    font_size: 18.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(1.0, 0.84, 0.0)),
                            ));
                        });
                });

            // ─── MESSAGE LINE ───
            parent.spawn((
                HudMessageText,
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.95, 0.7)),
                Node {
                    align_self: AlignSelf::Center,
                    ..default()
                },
            ));

            // ─── KEY HINTS ───
            parent.spawn((
                HudHintText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgba(0.85, 0.9, 1.0, 0.8)),
                Node {
                    margin: UiRect::all(Val::Px(10.0)),
                    ..default()
                },
            ));
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn update_clock_display(
    mut time_events: EventReader<TimeChangedEvent>,
    mut day_events: EventReader<DayChangedEvent>,
    mut hud_clock: ResMut<HudClock>,
    mut query: Query<&mut Text, With<HudClockText>>,
) {
    let mut changed = false;
    for ev in time_events.read() {
        hud_clock.time = ev.time;
        changed = true;
    }
    for ev in day_events.read() {
        hud_clock.day = ev.day;
        changed = true;
    }
    if !changed {
        return;
    }
    for mut text in &mut query {
        **text = clock_line(hud_clock.time, hud_clock.day);
    }
}

pub fn update_health_display(
    mut health_events: EventReader<BoatHealthChangedEvent>,
    mut texts: Query<&mut Text, With<HudHealthText>>,
    mut fills: Query<(&mut Node, &mut BackgroundColor), With<HudHealthFill>>,
) {
    let Some(latest) = health_events.read().last() else {
        return;
    };
    for mut text in &mut texts {
        **text = format!("Hull {:.0}/{:.0}", latest.hp, latest.max_hp);
    }
    let ratio = if latest.max_hp > 0.0 {
        (latest.hp / latest.max_hp).clamp(0.0, 1.0)
    } else {
        0.0
    };
    for (mut node, mut bg) in &mut fills {
        node.width = Val::Percent(ratio * 100.0);
        // Color gradient: green > yellow > red as the hull takes damage
        let color = if ratio > 0.5 {
            let t = (ratio - 0.5) * 2.0;
            Color::srgb(0.2 + 0.8 * (1.0 - t), 0.85, 0.3 * t)
        } else {
            let t = ratio * 2.0;
            Color::srgb(0.9, 0.85 * t, 0.1 * t)
        };
        *bg = BackgroundColor(color);
    }
}

pub fn update_gold_display(
    economy: Res<PlayerEconomy>,
    mut query: Query<&mut Text, With<HudGoldText>>,
) {
    if !economy.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format_gold(economy.gold);
    }
}

pub fn update_forecast_display(
    forecast: Res<StormForecast>,
    mut query: Query<(&mut Text, &mut TextColor), With<HudForecastText>>,
) {
    if !forecast.is_changed() {
        return;
    }
    let color = if forecast.stormy {
        Color::srgb(1.0, 0.45, 0.35)
    } else {
        Color::srgb(0.8, 0.85, 0.95)
    };
    for (mut text, mut text_color) in &mut query {
        **text = forecast_line(&forecast);
        text_color.0 = color;
    }
}

/// Turns gameplay events into a short-lived message.
pub fn collect_hud_messages(
    mut warnings: EventReader<NightEndWarningEvent>,
    mut storms: EventReader<DisasterWarningEvent>,
    mut outcomes: EventReader<FishingOutcomeEvent>,
    mut pickups: EventReader<ItemCollectedEvent>,
    mut wrecks: EventReader<BoatWreckedEvent>,
    mut saves: EventReader<SaveCompleteEvent>,
    mut loads: EventReader<LoadCompleteEvent>,
    fish: Res<FishRegistry>,
    items: Res<ItemRegistry>,
    mut message: ResMut<HudMessage>,
) {
    for ev in warnings.read() {
        message.show(format!("{} minutes until the night ends", ev.minutes_left));
    }
    for _ in storms.read() {
        message.show("A storm is gathering!");
    }
    for FishingOutcomeEvent(outcome) in outcomes.read() {
        match outcome {
            FishingOutcome::Caught { species, stored } => {
                let name = fish
                    .get(species)
                    .map(|f| f.name.as_str())
                    .unwrap_or(species.as_str());
                if *stored {
                    message.show(format!("Caught a {}!", name));
                } else {
                    message.show(format!("Caught a {}, but the hold is full", name));
                }
            }
            FishingOutcome::Cancelled { reason } => {
                let line = match reason {
                    CancelReason::WeakThrow => "Weak throw",
                    CancelReason::NoBite => "Nothing is biting",
                    CancelReason::MissedBite => "Too slow!",
                    CancelReason::LineSnapped => "The line snapped!",
                    CancelReason::FishLost => "The fish got away",
                    CancelReason::AgentMoving => "Hold still to fish",
                    _ => continue,
                };
                message.show(line);
            }
        }
    }
    for ev in pickups.read() {
        let name = items
            .get(&ev.item_id)
            .map(|def| def.name.as_str())
            .unwrap_or(ev.item_id.as_str());
        message.show(format!("Picked up {} x {}", ev.amount, name));
    }
    for _ in wrecks.read() {
        message.show("Wrecked! Towed back to harbour");
    }
    for ev in saves.read() {
        if ev.success {
            message.show("Game saved");
        } else {
            message.show("Save failed");
        }
    }
    for ev in loads.read() {
        if ev.success {
            message.show("Game loaded");
        }
    }
}

pub fn update_message_display(
    time: Res<Time>,
    voyage: Res<VoyageState>,
    mut message: ResMut<HudMessage>,
    mut query: Query<&mut Text, With<HudMessageText>>,
) {
    let expired = match message.timer.as_mut() {
        Some(timer) => timer.tick(time.delta()).finished(),
        None => false,
    };
    if expired {
        message.timer = None;
        message.text.clear();
    }

    let line = if voyage.prompt_open {
        "The night is over. [H] Head home   [C] Stay out".to_string()
    } else {
        message.text.clone()
    };
    for mut text in &mut query {
        if **text != line {
            **text = line.clone();
        }
    }
}

pub fn update_hint_display(
    state: Res<State<GameState>>,
    tuning: Res<EconomyTuning>,
    upgrades: Res<BoatUpgrades>,
    mut query: Query<&mut Text, With<HudHintText>>,
) {
    if !state.is_changed() && !upgrades.is_changed() {
        return;
    }
    let line = match state.get() {
        GameState::Loading => String::new(),
        GameState::Harbour => format!(
            "[Enter] Set sail   [E] Sell catch   [1] Engine {}g   [2] Hull {}g   [F5] Save   [F9] Load",
            tuning.upgrade_cost(UpgradeKind::Speed, upgrades.speed_level),
            tuning.upgrade_cost(UpgradeKind::Health, upgrades.health_level),
        ),
        GameState::Sea => "[WASD] Steer   [F] Cast   [F5] Save".to_string(),
    };
    for mut text in &mut query {
        **text = line.clone();
    }
}
