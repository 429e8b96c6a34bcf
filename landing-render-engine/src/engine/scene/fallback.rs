use super::hero_model::HeroModel;
use crate::engine::render::halftone_fallback::fallback_image;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::halftone::HALFTONE_SETTINGS;

#[derive(Component)]
pub struct HeroFallback;

fn buffer_size(windows: &Query<&Window, With<PrimaryWindow>>) -> UVec2 {
    windows
        .single()
        .map(|window| window.physical_size())
        .unwrap_or(UVec2::ONE)
        .max(UVec2::ONE)
}

/// Swap the model for the flat halftone.
pub fn enter_degraded(
    mut commands: Commands,
    models: Query<Entity, With<HeroModel>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
) {
    for model in &models {
        commands.entity(model).despawn();
    }

    let size = buffer_size(&windows);
    let image = images.add(fallback_image(size.x, size.y, &HALFTONE_SETTINGS));

    commands.spawn((
        Name::new("hero-fallback"),
        HeroFallback,
        ImageNode::new(image),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        GlobalZIndex(-1),
    ));
    info!("Hero fallback drawn at {}x{}", size.x, size.y);
}

/// Redraw at the new buffer size so dots keep their pixel pitch.
pub fn resize_fallback(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    fallbacks: Query<&ImageNode, With<HeroFallback>>,
    mut images: ResMut<Assets<Image>>,
) {
    if resized.read().last().is_none() {
        return;
    }

    let size = buffer_size(&windows);
    for node in &fallbacks {
        if let Some(image) = images.get_mut(&node.image) {
            *image = fallback_image(size.x, size.y, &HALFTONE_SETTINGS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .add_event::<WindowResized>();
        app.world_mut().spawn((
            Window {
                resolution: WindowResolution::new(64.0, 48.0),
                ..default()
            },
            PrimaryWindow,
        ));
        app
    }

    #[test]
    fn degrading_replaces_the_model_with_the_fallback() {
        let mut app = app();
        let model = app
            .world_mut()
            .spawn((HeroModel { rotation_speed: 0.25 }, Transform::default()))
            .id();
        app.add_systems(Update, enter_degraded);
        app.update();

        assert!(app.world().get_entity(model).is_err());

        let mut fallbacks = app
            .world_mut()
            .query_filtered::<&ImageNode, With<HeroFallback>>();
        let node = fallbacks.single(app.world()).unwrap();
        let image = app
            .world()
            .resource::<Assets<Image>>()
            .get(&node.image)
            .unwrap();
        assert_eq!(image.size(), UVec2::new(64, 48));
    }
}
