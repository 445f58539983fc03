use bevy::prelude::*;
use crate::{
    components::{apply_sorting_layer_system, lifetime_system, LevelEntity, SortingLayer},
    enemy::{spawn_enemy, ENEMY_SIZE},
    health::HealthSettings,
    physics::Collider,
    player::spawn_player,
};

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;
const GROUND_TOP: f32 = -2.0;
const GROUND_SIZE: Vec2 = Vec2::new(40.0, 1.0);
const PLAYER_START: Vec3 = Vec3::new(-6.0, 0.0, 2.0);
const ENEMY_STARTS: [(f32, f32); 3] = [(0.0, 2.5), (6.0, 1.5), (12.0, 3.0)];
const UI_TEXT_COLOR: Color = Color::rgb(0.9, 0.9, 0.9);

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    InGame,
    GameOver,
}

#[derive(Component)]
struct GameOverUI;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .insert_resource(ClearColor(Color::rgb(0.55, 0.75, 0.9)))
            .add_systems(OnEnter(AppState::InGame), spawn_level)
            .add_systems(Update, (lifetime_system, apply_sorting_layer_system))
            .add_systems(OnEnter(AppState::GameOver), setup_game_over_ui)
            .add_systems(Update, game_over_input_system.run_if(in_state(AppState::GameOver)))
            .add_systems(OnExit(AppState::GameOver), (despawn_by_marker::<LevelEntity>, despawn_by_marker::<GameOverUI>));
    }
}

fn spawn_level(mut commands: Commands, settings: Res<HealthSettings>) {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color: Color::rgb(0.35, 0.55, 0.25), custom_size: Some(GROUND_SIZE), ..default() },
            transform: Transform::from_xyz(0.0, GROUND_TOP - GROUND_SIZE.y / 2.0, SortingLayer::Background.z()),
            ..default()
        },
        Collider::cuboid(GROUND_SIZE.x, GROUND_SIZE.y),
        SortingLayer::Background,
        LevelEntity,
        Name::new("Ground"),
    ));

    spawn_player(&mut commands, &settings, PLAYER_START);

    for (x, patrol_half_width) in ENEMY_STARTS {
        let position = Vec3::new(x, GROUND_TOP + ENEMY_SIZE.y / 2.0, SortingLayer::Character.z());
        spawn_enemy(&mut commands, position, patrol_half_width);
    }
    info!("level spawned with {} enemies", ENEMY_STARTS.len());
}

fn setup_game_over_ui(mut commands: Commands) {
    commands.spawn((
        NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ..default()
        },
        GameOverUI,
    )).with_children(|parent| {
        parent.spawn(TextBundle::from_section(
            "You died. Press R to try again.",
            TextStyle { font_size: 40.0, color: UI_TEXT_COLOR, ..default() },
        ));
    });
}

fn game_over_input_system(keyboard: Res<ButtonInput<KeyCode>>, mut next_state: ResMut<NextState<AppState>>) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        info!("restarting level");
        next_state.set(AppState::InGame);
    }
}

fn despawn_by_marker<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
