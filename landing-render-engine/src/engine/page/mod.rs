//! Applying choreography to the page.
//!
//! Mappers queue [`style::PendingStyles`]; a platform sink writes them to
//! retained view handles. On the web those are DOM elements looked up once
//! by id, natively they are Bevy UI nodes registered at spawn.

/// View handle keys, style values and the sink trait.
pub mod style;

/// Scroll position, viewport size, cached section bounds and frame requests.
pub mod viewport;

/// Frame-coalesced recompute of section styles from the latest scroll state.
pub mod adapter;

/// Hero entrance tracks driven by the readiness signal.
pub mod intro;

/// Minimum-duration loader overlay gated on readiness.
pub mod loader;

/// DOM listeners and DOM style sink for the browser build.
#[cfg(target_arch = "wasm32")]
pub mod dom;

/// Bevy UI rendition of the page for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub mod native_ui;

use crate::engine::signals::scroll_cursor::ScrollCursor;
use bevy::prelude::*;

/// System sets ordering one page frame: collect input, recompute, animate, write.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageSet {
    Input,
    Recompute,
    Animate,
    Apply,
}

pub struct PagePlugin;

impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<viewport::PageViewport>()
            .init_resource::<viewport::FrameRequest>()
            .init_resource::<style::PendingStyles>()
            .init_resource::<ScrollCursor>()
            .add_event::<viewport::PageSignal>()
            .configure_sets(
                Update,
                (
                    PageSet::Input,
                    PageSet::Recompute,
                    PageSet::Animate,
                    PageSet::Apply,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    viewport::apply_page_signals.in_set(PageSet::Input),
                    adapter::run_choreography.in_set(PageSet::Recompute),
                    (intro::advance_hero_intro, loader::advance_loader).in_set(PageSet::Animate),
                ),
            )
            .add_observer(adapter::cancel_frame_on_section_removed)
            .add_plugins(intro::HeroIntroPlugin)
            .add_plugins(loader::LoaderPlugin);

        #[cfg(target_arch = "wasm32")]
        app.add_plugins(dom::DomPagePlugin);

        #[cfg(not(target_arch = "wasm32"))]
        app.add_plugins(native_ui::NativePagePlugin);
    }
}
