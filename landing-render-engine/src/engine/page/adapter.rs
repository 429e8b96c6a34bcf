use super::style::{PendingStyles, ViewKey, ViewStyle};
use super::viewport::{FrameRequest, PageViewport, ScrollSection, SectionBounds};
use crate::engine::choreography::card_deck::{DeckLayout, flank_entrance};
use crate::engine::choreography::hero::{hero_offset, map_hero};
use crate::engine::signals::scroll_cursor::ScrollCursor;
use bevy::prelude::*;
use constants::choreography::{PIP_EMPTY_ALPHA, PIP_FILLED_SCALE};

/// Recompute every scroll-driven section once per frame, and only when a
/// page signal asked for it.
pub fn run_choreography(
    mut request: ResMut<FrameRequest>,
    viewport: Res<PageViewport>,
    sections: Query<(&ScrollSection, &SectionBounds)>,
    mut cursor: ResMut<ScrollCursor>,
    mut pending: ResMut<PendingStyles>,
) {
    if !request.take() {
        return;
    }

    let deck = DeckLayout::default();
    for (section, bounds) in &sections {
        match section {
            ScrollSection::Hero => {
                let offset = write_hero_styles(&viewport, bounds, &mut pending);
                cursor.write(offset);
            }
            ScrollSection::CardDeck => write_deck_styles(&deck, &viewport, bounds, &mut pending),
        }
    }

    pending.push(
        ViewKey::PageRoot,
        ViewStyle::default().translate(0.0, -viewport.scroll_y),
    );
}

/// Push hero layer styles and return the hero offset for the scroll cursor.
pub fn write_hero_styles(
    viewport: &PageViewport,
    bounds: &SectionBounds,
    pending: &mut PendingStyles,
) -> f32 {
    let offset = hero_offset(viewport.scroll_y, bounds.top);

    // Past one viewport the previous styles stay frozen.
    let Some(frame) = map_hero(offset, viewport.viewport_height) else {
        return offset;
    };

    pending.push(
        ViewKey::HeroContent,
        ViewStyle::default()
            .translate(0.0, frame.content_translate_y)
            .opacity(frame.content_opacity),
    );
    pending.push(
        ViewKey::HeroBackground,
        ViewStyle::default().translate(0.0, frame.background_translate_y),
    );
    pending.push(
        ViewKey::HeroBlur,
        ViewStyle::default().opacity(frame.content_opacity),
    );
    offset
}

pub fn write_deck_styles(
    deck: &DeckLayout,
    viewport: &PageViewport,
    bounds: &SectionBounds,
    pending: &mut PendingStyles,
) {
    let vh = viewport.viewport_height;
    let scrolled = DeckLayout::scrolled(viewport.scroll_y, bounds.top);
    let progress = deck.progress(scrolled, vh);

    for (index, card) in deck.cards(progress, vh).into_iter().enumerate() {
        pending.push(
            ViewKey::DeckCard(index),
            ViewStyle::default()
                .translate(0.0, card.translate_y)
                .scale(card.scale)
                .opacity(card.opacity),
        );
    }

    for index in 0..deck.count {
        let style = if DeckLayout::pip_filled(progress, index) {
            ViewStyle::default().fill_alpha(1.0).scale(PIP_FILLED_SCALE)
        } else {
            ViewStyle::default().fill_alpha(PIP_EMPTY_ALPHA).scale(1.0)
        };
        pending.push(ViewKey::DeckPip(index), style);
    }

    let flank = flank_entrance(viewport.scroll_y, bounds.top, vh);
    pending.push(
        ViewKey::DeckFlankLeft,
        ViewStyle::default()
            .translate(-flank.offset_px, 0.0)
            .opacity(flank.opacity),
    );
    pending.push(
        ViewKey::DeckFlankRight,
        ViewStyle::default()
            .translate(flank.offset_px, 0.0)
            .opacity(flank.opacity),
    );

    pending.push(
        ViewKey::DeckStage,
        ViewStyle::default().translate(0.0, deck.stage_offset(scrolled, vh)),
    );
}

/// Drop the pending recompute once the last scroll-driven section is gone.
pub fn cancel_frame_on_section_removed(
    trigger: Trigger<OnRemove, ScrollSection>,
    sections: Query<Entity, With<ScrollSection>>,
    mut request: ResMut<FrameRequest>,
) {
    let removed = trigger.target();
    let remaining = sections.iter().filter(|entity| *entity != removed).count();
    if remaining == 0 {
        request.cancel();
        info!("Last scroll section removed; pending frame cancelled");
    }
}
