use bevy::prelude::*;
use breakdown::{
    game::{SCREEN_HEIGHT, SCREEN_WIDTH},
    GamePlugins,
};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Breakdown".into(),
                resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugins)
        .run();
}
