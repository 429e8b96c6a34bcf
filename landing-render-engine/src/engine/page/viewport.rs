use bevy::prelude::*;
use constants::choreography::DECK_CARD_COUNT;

/// Sections whose styles follow the scroll position.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollSection {
    Hero,
    CardDeck,
}

impl ScrollSection {
    pub fn dom_id(&self) -> &'static str {
        match self {
            Self::Hero => "hero-section",
            Self::CardDeck => "about-section",
        }
    }

    /// Section height in the stacked page layout.
    pub fn height(&self, viewport_height: f32) -> f32 {
        match self {
            Self::Hero => viewport_height,
            Self::CardDeck => DECK_CARD_COUNT as f32 * viewport_height,
        }
    }

    /// Document offset of the section's top edge when the page is laid out
    /// as hero, then deck, then the remaining full-height sections.
    pub fn stacked_top(&self, viewport_height: f32) -> f32 {
        match self {
            Self::Hero => 0.0,
            Self::CardDeck => Self::Hero.height(viewport_height),
        }
    }
}

/// Cached layout bound for a section, refreshed only on resize.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f32,
}

/// Document scroll position and viewport size in CSS pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PageViewport {
    pub scroll_y: f32,
    pub viewport_height: f32,
}

impl Default for PageViewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: 720.0,
        }
    }
}

impl PageViewport {
    /// Total scrollable height of the stacked page: hero, deck, and one
    /// trailing viewport for the testimonial section.
    pub fn page_height(&self) -> f32 {
        let vh = self.viewport_height;
        ScrollSection::Hero.height(vh) + ScrollSection::CardDeck.height(vh) + vh
    }

    pub fn max_scroll(&self) -> f32 {
        (self.page_height() - self.viewport_height).max(0.0)
    }
}

/// Raw page input. Several may arrive between two frames.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PageSignal {
    Scrolled { scroll_y: f32 },
    Resized { viewport_height: f32 },
    /// Measured top of a section, sent by layouts that can query real bounds.
    Measured { section: ScrollSection, top: f32 },
}

/// At most one pending recompute. Bursts of signals collapse into it.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pending: bool,
    coalesced: u32,
}

impl FrameRequest {
    pub fn request(&mut self) {
        self.pending = true;
        self.coalesced += 1;
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        let pending = self.pending;
        self.pending = false;
        self.coalesced = 0;
        pending
    }

    pub fn cancel(&mut self) {
        self.pending = false;
        self.coalesced = 0;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Signals folded into the pending request.
    pub fn coalesced(&self) -> u32 {
        self.coalesced
    }
}

/// Fold this frame's signals into the viewport and section caches.
///
/// Scroll is last-write-wins. A resize re-derives every cached section top
/// right away, so the next recompute sees the new viewport height without
/// waiting for a scroll event.
pub fn apply_page_signals(
    mut signals: EventReader<PageSignal>,
    mut viewport: ResMut<PageViewport>,
    mut request: ResMut<FrameRequest>,
    mut sections: Query<(&ScrollSection, &mut SectionBounds)>,
) {
    for signal in signals.read() {
        match *signal {
            PageSignal::Scrolled { scroll_y } => {
                viewport.scroll_y = scroll_y;
            }
            PageSignal::Resized { viewport_height } => {
                viewport.viewport_height = viewport_height.max(0.0);
                for (section, mut bounds) in &mut sections {
                    bounds.top = section.stacked_top(viewport.viewport_height);
                }
            }
            PageSignal::Measured { section, top } => {
                for (candidate, mut bounds) in &mut sections {
                    if *candidate == section {
                        bounds.top = top;
                    }
                }
            }
        }
        request.request();
    }
}
