//! Fishing panel: a bottom-centre overlay with the phase readout and the
//! throw, reel, tension, progress and balance bars.

use bevy::prelude::*;

use super::{FishingPhase, FishingSession};
use crate::shared::*;

const COLOR_PANEL: Color = Color::srgba(0.02, 0.04, 0.1, 0.8);
const COLOR_TRACK: Color = Color::srgba(0.15, 0.15, 0.2, 0.9);
const COLOR_THROW: Color = Color::srgb(0.95, 0.75, 0.2);
const COLOR_REEL: Color = Color::srgb(0.2, 0.85, 0.3);
const COLOR_TENSION_LOW: Color = Color::srgb(0.3, 0.6, 0.95);
const COLOR_TENSION_HIGH: Color = Color::srgb(0.95, 0.25, 0.15);
const COLOR_PROGRESS: Color = Color::srgb(0.1, 0.7, 0.95);
const COLOR_MARKER: Color = Color::WHITE;
const COLOR_TARGET: Color = Color::srgb(0.9, 0.35, 0.1);

const BAR_WIDTH: f32 = 260.0;
const BAR_HEIGHT: f32 = 10.0;
const MARKER_WIDTH: f32 = 6.0;

#[derive(Component)]
pub struct FishingPanel;

#[derive(Component)]
pub struct FishingStatusText;

/// A fill whose width tracks one session value.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingBar {
    Throw,
    Reel,
    Tension,
    Progress,
}

/// A thin marker positioned along a track.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingMarker {
    ThrowTarget,
    Balance,
    BalanceTarget,
}

pub fn spawn_fishing_panel(mut commands: Commands) {
    commands
        .spawn((
            FishingPanel,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-(BAR_WIDTH + 24.0) / 2.0)),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(COLOR_PANEL),
            Visibility::Hidden,
        ))
        .with_children(|panel| {
            panel.spawn((
                FishingStatusText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            // Throw power with the moving target on the same track.
            panel.spawn(track()).with_children(|t| {
                t.spawn(fill(FishingBar::Throw, COLOR_THROW));
                t.spawn(marker(FishingMarker::ThrowTarget, COLOR_TARGET));
            });
            panel.spawn(track()).with_children(|t| {
                t.spawn(fill(FishingBar::Reel, COLOR_REEL));
            });
            panel.spawn(track()).with_children(|t| {
                t.spawn(fill(FishingBar::Tension, COLOR_TENSION_LOW));
            });
            panel.spawn(track()).with_children(|t| {
                t.spawn(fill(FishingBar::Progress, COLOR_PROGRESS));
            });
            panel.spawn(track()).with_children(|t| {
                t.spawn(marker(FishingMarker::BalanceTarget, COLOR_TARGET));
                t.spawn(marker(FishingMarker::Balance, COLOR_MARKER));
            });
        });
}

fn track() -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Px(BAR_WIDTH),
            height: Val::Px(BAR_HEIGHT),
            ..default()
        },
        BackgroundColor(COLOR_TRACK),
    )
}

fn fill(bar: FishingBar, color: Color) -> (FishingBar, Node, BackgroundColor) {
    (
        bar,
        Node {
            width: Val::Percent(0.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(color),
    )
}

fn marker(kind: FishingMarker, color: Color) -> (FishingMarker, Node, BackgroundColor) {
    (
        kind,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Px(MARKER_WIDTH),
            height: Val::Percent(100.0),
            left: Val::Px(0.0),
            ..default()
        },
        BackgroundColor(color),
    )
}

/// Offset of a marker for a value in `0.0..=1.0`.
fn marker_left(fraction: f32) -> Val {
    Val::Px(fraction.clamp(0.0, 1.0) * (BAR_WIDTH - MARKER_WIDTH))
}

fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    let a = from.to_srgba();
    let b = to.to_srgba();
    Color::srgb(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}

fn status_line(session: &FishingSession) -> String {
    match session.phase() {
        FishingPhase::Idle => String::new(),
        FishingPhase::Throwing => "Release [F] on the marker".to_string(),
        FishingPhase::AwaitingBite => {
            format!("Waiting for a bite... (throw {:.0}%)", session.throw_accuracy() * 100.0)
        }
        FishingPhase::BiteDetected => "Bite! Press [Space]".to_string(),
        FishingPhase::Reeling => match session.selected_fish() {
            Some(fish) => format!("Reeling in a {} - [Space] reel, [A]/[D] balance", fish.name),
            None => "Reeling".to_string(),
        },
        FishingPhase::Caught | FishingPhase::Cancelled => String::new(),
    }
}

pub fn sync_fishing_panel(
    session: Res<FishingSession>,
    tuning: Res<FishingTuning>,
    mut panels: Query<&mut Visibility, With<FishingPanel>>,
    mut texts: Query<&mut Text, With<FishingStatusText>>,
    mut bars: Query<(&FishingBar, &mut Node, &mut BackgroundColor), Without<FishingMarker>>,
    mut markers: Query<(&FishingMarker, &mut Node), Without<FishingBar>>,
) {
    if !session.is_changed() {
        return;
    }

    for mut visibility in &mut panels {
        *visibility = if session.is_active() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut text in &mut texts {
        **text = status_line(&session);
    }

    let ratio = |value: f32, max: f32| if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    for (bar, mut node, mut bg) in &mut bars {
        let fraction = match bar {
            FishingBar::Throw => ratio(session.throw_power(), tuning.max_throw_power),
            FishingBar::Reel => ratio(session.reel_power(), tuning.max_reel_power),
            FishingBar::Tension => {
                let t = ratio(session.line_tension(), tuning.max_line_tension);
                *bg = BackgroundColor(lerp_color(COLOR_TENSION_LOW, COLOR_TENSION_HIGH, t));
                t
            }
            FishingBar::Progress => session.progress(),
        };
        node.width = Val::Percent(fraction * 100.0);
    }

    for (kind, mut node) in &mut markers {
        let fraction = match kind {
            FishingMarker::ThrowTarget => session.throw_target(),
            FishingMarker::Balance => (session.balance_position() + 1.0) / 2.0,
            FishingMarker::BalanceTarget => (session.balance_target() + 1.0) / 2.0,
        };
        node.left = marker_left(fraction);
    }
}
