use bevy::prelude::*;
use bevy::window::PresentMode;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy-hero".into()),
            fit_canvas_to_parent: true,
            // Page scrolling belongs to the document.
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Dr. Madhan Institute of Future".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
