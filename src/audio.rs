use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySoundEvent(pub SoundEffect);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    PlayerOuch,
    /// Index into [`DEATH_CLIPS`].
    PlayerDeath(usize),
    RocketLaunch,
    EnemyDestroyed,
}

pub const OUCH_CLIP: &str = "audio/ouch.ogg";
pub const DEATH_CLIPS: [&str; 3] = [
    "audio/death_fall.ogg",
    "audio/death_splash.ogg",
    "audio/death_scream.ogg",
];

impl SoundEffect {
    pub fn path(self) -> Option<&'static str> {
        match self {
            SoundEffect::PlayerOuch => Some(OUCH_CLIP),
            SoundEffect::PlayerDeath(index) => DEATH_CLIPS.get(index).copied(),
            SoundEffect::RocketLaunch => Some("audio/rocket_launch.ogg"),
            SoundEffect::EnemyDestroyed => Some("audio/enemy_destroyed.ogg"),
        }
    }
}

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySoundEvent>()
            .add_systems(Update, play_sound_system);
    }
}

fn play_sound_system(
    mut sound_events: EventReader<PlaySoundEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    for event in sound_events.read() {
        let Some(path) = event.0.path() else {
            warn!("no clip configured for {:?}", event.0);
            continue;
        };
        commands.spawn(AudioBundle {
            source: asset_server.load(path),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}
