use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;

use crate::engine::carousel::systems::CarouselPlugin;
use crate::engine::core::app_state::HeroStatePlugin;
use crate::engine::core::config::LandingConfig;
use crate::engine::core::window_config::create_window_config;
use crate::engine::page::PagePlugin;
use crate::engine::render::halftone_post_processing::HalftonePostProcessPlugin;
use crate::engine::scene::hero_model::HeroScenePlugin;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::store::feed::StorePlugin;

pub fn create_app() -> App {
    let config = LandingConfig::embedded();
    println!("=== DMIF LANDING HERO (HALFTONE) ===");
    println!(
        "  Model: {} ({} rad/s, ready timeout {} ms)",
        config.model_path, config.rotation_speed, config.ready_timeout_ms
    );

    let mut app = App::new();

    app.insert_resource(config)
        .add_plugins(create_default_plugins())
        .add_plugins(HeroStatePlugin)
        .add_plugins(WebRpcPlugin)
        .add_plugins(StorePlugin)
        .add_plugins(PagePlugin)
        .add_plugins(CarouselPlugin)
        .add_plugins(HalftonePostProcessPlugin)
        .add_plugins(HeroScenePlugin);

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
