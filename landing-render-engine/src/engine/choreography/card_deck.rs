use super::easing::{ease_out_cubic, lerp};
use constants::choreography::{
    DECK_CARD_COUNT, ENTRY_OFFSET_FACTOR, FLANK_SLIDE_PX, MIN_BURIED_OPACITY, OPACITY_STEP,
    PEEK_PX, SCALE_STEP,
};

/// Tuning for a deck of stacked cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckLayout {
    pub count: usize,
    pub peek_px: f32,
    pub scale_step: f32,
    pub opacity_step: f32,
    pub min_opacity: f32,
    pub entry_offset_factor: f32,
}

impl Default for DeckLayout {
    fn default() -> Self {
        Self {
            count: DECK_CARD_COUNT,
            peek_px: PEEK_PX,
            scale_step: SCALE_STEP,
            opacity_step: OPACITY_STEP,
            min_opacity: MIN_BURIED_OPACITY,
            entry_offset_factor: ENTRY_OFFSET_FACTOR,
        }
    }
}

/// Interpolated style for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFrame {
    pub translate_y: f32,
    pub scale: f32,
    pub opacity: f32,
}

/// Slide-in state for the two panels flanking the deck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlankFrame {
    /// Distance still to travel. The left panel sits at `-offset_px`, the
    /// right panel at `+offset_px`.
    pub offset_px: f32,
    pub opacity: f32,
}

impl DeckLayout {
    /// Scroll distance into the section, clamped at zero.
    pub fn scrolled(scroll_y: f32, section_top: f32) -> f32 {
        (scroll_y - section_top).max(0.0)
    }

    /// Continuous deck progress in `[1, count]`.
    ///
    /// 1.0 means card 0 is fully in, 2.0 card 1, and so on.
    pub fn progress(&self, scrolled: f32, viewport_height: f32) -> f32 {
        let upper = self.count.max(1) as f32;
        if viewport_height <= 0.0 {
            return 1.0;
        }
        (1.0 + scrolled.max(0.0) / viewport_height).clamp(1.0, upper)
    }

    /// Number of cards stacked on top of card `index` once fully scrolled.
    fn depth(&self, index: usize) -> f32 {
        self.count.saturating_sub(1).saturating_sub(index) as f32
    }

    pub fn final_scale(&self, index: usize) -> f32 {
        1.0 - self.depth(index) * self.scale_step
    }

    pub fn final_nudge(&self, index: usize) -> f32 {
        -self.depth(index) * self.peek_px
    }

    pub fn final_opacity(&self, index: usize) -> f32 {
        (1.0 - self.depth(index) * self.opacity_step).max(self.min_opacity)
    }

    pub fn card(&self, index: usize, progress: f32, viewport_height: f32) -> CardFrame {
        let position = index as f32;

        // 0 before the card starts entering, 1 once fully in
        let entry = (progress - position).clamp(0.0, 1.0);
        // how far the next card has buried this one
        let stack_depth = (progress - (position + 1.0)).max(0.0);
        let stack_t = stack_depth.min(1.0);

        let offscreen_y = (1.0 - entry) * viewport_height * self.entry_offset_factor;
        let stacked_y = self.final_nudge(index) * stack_t;

        let opacity = if entry < 1.0 {
            entry
        } else {
            lerp(1.0, self.final_opacity(index), stack_t)
        };

        CardFrame {
            translate_y: offscreen_y + stacked_y,
            scale: lerp(1.0, self.final_scale(index), stack_t),
            opacity,
        }
    }

    pub fn cards(&self, progress: f32, viewport_height: f32) -> Vec<CardFrame> {
        (0..self.count)
            .map(|index| self.card(index, progress, viewport_height))
            .collect()
    }

    pub fn pip_filled(progress: f32, index: usize) -> bool {
        progress >= index as f32 + 1.0
    }

    /// Offset of the pinned card stage while the section scrolls by.
    pub fn stage_offset(&self, scrolled: f32, viewport_height: f32) -> f32 {
        let travel = self.count.saturating_sub(1) as f32 * viewport_height.max(0.0);
        scrolled.clamp(0.0, travel)
    }
}

/// Flanking panels slide in over the single viewport height of scroll that
/// brings the section's top edge from the bottom of the viewport to the top.
pub fn flank_entrance(scroll_y: f32, section_top: f32, viewport_height: f32) -> FlankFrame {
    let raw = if viewport_height <= 0.0 {
        1.0
    } else {
        ((scroll_y - (section_top - viewport_height)) / viewport_height).clamp(0.0, 1.0)
    };
    let eased = ease_out_cubic(raw);

    FlankFrame {
        offset_px: FLANK_SLIDE_PX * (1.0 - eased),
        opacity: eased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f32 = 1000.0;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn fully_scrolled_deck_matches_terminal_layout() {
        let deck = DeckLayout::default();
        let progress = deck.progress(10.0 * VH, VH);
        assert_eq!(progress, 5.0);

        let first = deck.card(0, progress, VH);
        assert!(close(first.translate_y, -56.0));
        assert!(close(first.scale, 0.84));
        assert!(close(first.opacity, 0.76));

        let last = deck.card(4, progress, VH);
        assert!(close(last.translate_y, 0.0));
        assert!(close(last.scale, 1.0));
        assert!(close(last.opacity, 1.0));
    }

    #[test]
    fn progress_clamps_for_negative_scroll() {
        let deck = DeckLayout::default();
        let at_zero = deck.progress(DeckLayout::scrolled(0.0, 0.0), VH);
        assert_eq!(at_zero, 1.0);
        for scroll_y in [-1.0, -500.0, -1e6] {
            let scrolled = DeckLayout::scrolled(scroll_y, 0.0);
            assert_eq!(deck.progress(scrolled, VH), at_zero);
            assert_eq!(deck.cards(at_zero, VH), deck.cards(deck.progress(scrolled, VH), VH));
        }
    }

    #[test]
    fn unentered_cards_wait_below_the_fold() {
        let deck = DeckLayout::default();
        let card = deck.card(3, 1.0, VH);
        assert!(close(card.translate_y, VH * 0.85));
        assert_eq!(card.opacity, 0.0);
        assert_eq!(card.scale, 1.0);
    }

    #[test]
    fn entering_card_fades_in_with_entry() {
        let deck = DeckLayout::default();
        let card = deck.card(1, 1.5, VH);
        assert!(close(card.translate_y, 0.5 * VH * 0.85));
        assert!(close(card.opacity, 0.5));
    }

    #[test]
    fn buried_opacity_never_drops_below_floor() {
        let layout = DeckLayout {
            count: 9,
            ..DeckLayout::default()
        };
        assert!(close(layout.final_opacity(0), 0.72));
        let card = layout.card(0, 9.0, VH);
        assert!(close(card.opacity, 0.72));
    }

    #[test]
    fn earlier_cards_end_more_compressed() {
        let deck = DeckLayout::default();
        let cards = deck.cards(5.0, VH);
        for pair in cards.windows(2) {
            assert!(pair[0].scale < pair[1].scale);
            assert!(pair[0].translate_y < pair[1].translate_y);
        }
    }

    #[test]
    fn pips_fill_as_each_card_lands() {
        assert!(DeckLayout::pip_filled(1.0, 0));
        assert!(!DeckLayout::pip_filled(1.99, 1));
        assert!(DeckLayout::pip_filled(2.0, 1));
        assert!(!DeckLayout::pip_filled(5.0, 5));
    }

    #[test]
    fn stage_pins_for_the_length_of_the_deck() {
        let deck = DeckLayout::default();
        assert_eq!(deck.stage_offset(-10.0, VH), 0.0);
        assert_eq!(deck.stage_offset(1500.0, VH), 1500.0);
        assert_eq!(deck.stage_offset(9000.0, VH), 4.0 * VH);
    }

    #[test]
    fn flanks_slide_in_over_one_viewport() {
        let top = 2000.0;
        let before = flank_entrance(top - VH - 10.0, top, VH);
        assert!(close(before.offset_px, 80.0));
        assert_eq!(before.opacity, 0.0);

        let halfway = flank_entrance(top - VH / 2.0, top, VH);
        assert!(close(halfway.opacity, 0.875));
        assert!(close(halfway.offset_px, 10.0));

        let arrived = flank_entrance(top, top, VH);
        assert!(close(arrived.offset_px, 0.0));
        assert_eq!(arrived.opacity, 1.0);
    }

    #[test]
    fn zero_viewport_height_is_treated_as_settled() {
        let deck = DeckLayout::default();
        assert_eq!(deck.progress(300.0, 0.0), 1.0);
        assert_eq!(flank_entrance(0.0, 0.0, 0.0).opacity, 1.0);
    }
}
