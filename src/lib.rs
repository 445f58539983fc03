use bevy::{app::PluginGroupBuilder, prelude::*};

pub mod audio;
pub mod camera_systems;
pub mod components;
pub mod enemy;
pub mod game;
pub mod health;
pub mod health_bar;
pub mod physics;
pub mod player;
pub mod spirit;
pub mod weapons;

use audio::GameAudioPlugin;
use camera_systems::CameraSystemsPlugin;
use enemy::EnemyPlugin;
use game::GamePlugin;
use health::HealthPlugin;
use health_bar::HealthBarPlugin;
use physics::PhysicsPlugin;
use player::PlayerPlugin;
use spirit::SpiritPlugin;
use weapons::WeaponsPlugin;

/// Every gameplay plugin. Needs `DefaultPlugins` (or equivalent) alongside.
pub struct GamePlugins;

impl PluginGroup for GamePlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(GamePlugin)
            .add(PhysicsPlugin)
            .add(HealthPlugin)
            .add(HealthBarPlugin)
            .add(PlayerPlugin)
            .add(WeaponsPlugin)
            .add(EnemyPlugin)
            .add(SpiritPlugin)
            .add(GameAudioPlugin)
            .add(CameraSystemsPlugin)
    }
}
