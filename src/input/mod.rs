use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<InputContext>()
            .add_systems(
                PreUpdate,
                (manage_input_context, reset_and_read_input).chain(),
            );
    }
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub cast: KeyCode,
    pub reel: KeyCode,
    pub balance_left: KeyCode,
    pub balance_right: KeyCode,
    pub go_home: KeyCode,
    pub stay_out: KeyCode,
    pub set_sail: KeyCode,
    pub sell_catch: KeyCode,
    pub upgrade_speed: KeyCode,
    pub upgrade_health: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            cast: KeyCode::KeyF,
            reel: KeyCode::Space,
            balance_left: KeyCode::KeyA,
            balance_right: KeyCode::KeyD,
            go_home: KeyCode::KeyH,
            stay_out: KeyCode::KeyC,
            set_sail: KeyCode::Enter,
            sell_catch: KeyCode::KeyE,
            upgrade_speed: KeyCode::Digit1,
            upgrade_health: KeyCode::Digit2,
        }
    }
}

/// Keeps the input context in step with the game state and the night-end prompt.
fn manage_input_context(
    state: Res<State<GameState>>,
    voyage: Res<VoyageState>,
    mut context: ResMut<InputContext>,
) {
    let next = match state.get() {
        GameState::Loading => InputContext::Disabled,
        GameState::Harbour => InputContext::Harbour,
        GameState::Sea if voyage.prompt_open => InputContext::Prompt,
        GameState::Sea => InputContext::Sailing,
    };
    if *context != next {
        *context = next;
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    input.quicksave = keys.just_pressed(KeyCode::F5);
    input.quickload = keys.just_pressed(KeyCode::F9);

    match *context {
        InputContext::Disabled => {}

        InputContext::Harbour => {
            input.set_sail = keys.just_pressed(bindings.set_sail);
            input.sell_catch = keys.just_pressed(bindings.sell_catch);
            if keys.just_pressed(bindings.upgrade_speed) {
                input.upgrade = Some(UpgradeKind::Speed);
            } else if keys.just_pressed(bindings.upgrade_health) {
                input.upgrade = Some(UpgradeKind::Health);
            }
        }

        InputContext::Sailing => {
            let mut axis = Vec2::ZERO;
            if keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp) {
                axis.y += 1.0;
            }
            if keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown) {
                axis.y -= 1.0;
            }
            if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
                axis.x -= 1.0;
            }
            if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
                axis.x += 1.0;
            }
            input.move_axis = axis.normalize_or_zero();

            input.cast_pressed = keys.just_pressed(bindings.cast);
            input.cast_released = keys.just_released(bindings.cast);
            input.reel_held = keys.pressed(bindings.reel);
            input.reel_pressed = keys.just_pressed(bindings.reel);

            // Balance shares A/D with steering; steering is locked while a
            // line is out, so the two never act at once.
            let mut balance = 0.0;
            if keys.pressed(bindings.balance_left) {
                balance -= 1.0;
            }
            if keys.pressed(bindings.balance_right) {
                balance += 1.0;
            }
            input.balance_axis = balance;
        }

        InputContext::Prompt => {
            input.go_home = keys.just_pressed(bindings.go_home);
            input.stay_out = keys.just_pressed(bindings.stay_out);
        }
    }
}
