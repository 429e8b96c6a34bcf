use super::fallback::{enter_degraded, resize_fallback};
use crate::engine::core::app_state::{
    DegradedReason, HeroState, transition_to_degraded, transition_to_ready,
};
use crate::engine::core::config::LandingConfig;
use crate::engine::page::viewport::PageViewport;
use crate::engine::signals::scroll_cursor::ScrollCursor;
use bevy::asset::LoadState;
use bevy::pbr::light_consts;
use bevy::prelude::*;
use constants::halftone::HALFTONE_SETTINGS;
use constants::scene::{
    AMBIENT_BRIGHTNESS, CAMERA_FOV_DEGREES, CAMERA_POSITION, DIRECTIONAL_INTENSITY,
    DIRECTIONAL_POSITION, HERO_BACKDROP, MODEL_GROUP_OFFSET,
};
use std::time::Duration;

/// Converts the unitless ambient factor to cd/m².
const AMBIENT_SCALE: f32 = 1000.0;

#[derive(Component)]
pub struct HeroCamera;

/// Model group. Rotates about Y at `rotation_speed` rad/s.
#[derive(Component, Debug, Clone, Copy)]
pub struct HeroModel {
    pub rotation_speed: f32,
}

/// Pending model load. Removed once the model resolves either way.
#[derive(Resource, Debug)]
pub struct HeroModelLoad {
    pub handle: Handle<Scene>,
    waited: Duration,
    timeout: Duration,
}

impl HeroModelLoad {
    pub fn new(handle: Handle<Scene>, timeout: Duration) -> Self {
        Self {
            handle,
            waited: Duration::ZERO,
            timeout,
        }
    }

    /// Add `delta` to the wait; true once the timeout is reached.
    pub fn wait(&mut self, delta: Duration) -> bool {
        self.waited += delta;
        self.waited >= self.timeout
    }
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Name::new("hero-camera"),
        HeroCamera,
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(HERO_BACKDROP),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        HALFTONE_SETTINGS,
    ));
}

fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS * AMBIENT_SCALE,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_INTENSITY * light_consts::lux::AMBIENT_DAYLIGHT,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn setup_hero_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<LandingConfig>,
    mut next_state: ResMut<NextState<HeroState>>,
) {
    spawn_camera(&mut commands);
    spawn_lighting(&mut commands);

    if config.prefer_fallback {
        transition_to_degraded(DegradedReason::Disabled, &mut commands, &mut next_state);
        return;
    }

    info!("Loading hero model from: {}", config.model_path);
    let handle = asset_server.load(GltfAssetLabel::Scene(0).from_asset(config.model_path.clone()));

    commands
        .spawn((
            Name::new("hero-model"),
            HeroModel {
                rotation_speed: config.rotation_speed,
            },
            Transform::from_translation(MODEL_GROUP_OFFSET),
            Visibility::default(),
        ))
        .with_children(|group| {
            group.spawn((
                SceneRoot(handle.clone()),
                Transform::from_scale(Vec3::splat(config.model_scale)),
            ));
        });

    commands.insert_resource(HeroModelLoad::new(handle, config.ready_timeout()));
}

pub fn watch_model_load(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    load: Option<ResMut<HeroModelLoad>>,
    mut next_state: ResMut<NextState<HeroState>>,
) {
    let Some(mut load) = load else {
        return;
    };

    match asset_server.load_state(&load.handle) {
        LoadState::Loaded => {
            commands.remove_resource::<HeroModelLoad>();
            transition_to_ready(&mut next_state);
        }
        LoadState::Failed(err) => {
            error!("Failed to load hero model: {}", err);
            commands.remove_resource::<HeroModelLoad>();
            transition_to_degraded(DegradedReason::LoadFailed, &mut commands, &mut next_state);
        }
        _ => {
            if load.wait(time.delta()) {
                warn!("Hero model not loaded after {:?}", load.timeout);
                commands.remove_resource::<HeroModelLoad>();
                transition_to_degraded(DegradedReason::TimedOut, &mut commands, &mut next_state);
            }
        }
    }
}

/// Frame-rate independent rotation, held while the hero is out of view.
pub fn rotate_hero_model(
    time: Res<Time>,
    cursor: Res<ScrollCursor>,
    viewport: Res<PageViewport>,
    mut models: Query<(&HeroModel, &mut Transform)>,
) {
    if cursor.hero_scrolled_past(viewport.viewport_height) {
        return;
    }
    let delta = time.delta_secs();
    for (model, mut transform) in &mut models {
        transform.rotate_y(model.rotation_speed * delta);
    }
}

pub struct HeroScenePlugin;

impl Plugin for HeroScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScrollCursor>()
            .init_resource::<PageViewport>()
            .add_systems(Startup, setup_hero_scene)
            .add_systems(OnEnter(HeroState::Degraded), enter_degraded)
            .add_systems(
                Update,
                (
                    watch_model_load.run_if(in_state(HeroState::Loading)),
                    rotate_hero_model,
                    resize_fallback.run_if(in_state(HeroState::Degraded)),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::app_state::HeroStatePlugin;
    use crate::engine::signals::readiness::ReadinessSignal;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    #[test]
    fn wait_reports_timeout() {
        let mut load = HeroModelLoad::new(Handle::default(), Duration::from_millis(100));
        assert!(!load.wait(Duration::from_millis(60)));
        assert!(load.wait(Duration::from_millis(60)));
    }

    #[test]
    fn unresolved_model_degrades_after_timeout() {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            StatesPlugin,
            HeroStatePlugin,
        ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
        .insert_resource(HeroModelLoad::new(
            Handle::default(),
            Duration::from_millis(100),
        ))
        .add_systems(
            Update,
            watch_model_load.run_if(in_state(HeroState::Loading)),
        );

        for _ in 0..6 {
            app.update();
        }

        assert_eq!(
            *app.world().resource::<State<HeroState>>().get(),
            HeroState::Degraded
        );
        assert_eq!(
            *app.world().resource::<DegradedReason>(),
            DegradedReason::TimedOut
        );
        assert!(app.world().get_resource::<HeroModelLoad>().is_none());
        assert!(app.world().resource::<ReadinessSignal>().is_ready());
    }

    fn rotation_app(hero_offset: f32) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<PageViewport>()
            .init_resource::<ScrollCursor>()
            .add_systems(Update, rotate_hero_model);
        app.world_mut()
            .resource_mut::<ScrollCursor>()
            .write(hero_offset);
        let model = app
            .world_mut()
            .spawn((
                HeroModel {
                    rotation_speed: 0.25,
                },
                Transform::default(),
            ))
            .id();
        (app, model)
    }

    #[test]
    fn model_rotates_while_hero_is_visible() {
        let (mut app, model) = rotation_app(0.0);
        for _ in 0..3 {
            app.update();
        }
        let rotation = app.world().get::<Transform>(model).unwrap().rotation;
        assert_ne!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn model_holds_once_hero_is_scrolled_past() {
        let viewport_height = PageViewport::default().viewport_height;
        let (mut app, model) = rotation_app(viewport_height + 1.0);
        for _ in 0..3 {
            app.update();
        }
        let rotation = app.world().get::<Transform>(model).unwrap().rotation;
        assert_eq!(rotation, Quat::IDENTITY);
    }
}
