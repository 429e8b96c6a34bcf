use bevy::prelude::*;

/// Retained view handles the choreography writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub enum ViewKey {
    PageRoot,
    HeroContent,
    HeroBackground,
    HeroBlur,
    HeroLeft,
    HeroRight,
    HeroGrid,
    DeckStage,
    DeckFlankLeft,
    DeckFlankRight,
    DeckCard(usize),
    DeckPip(usize),
    Loader,
}

impl ViewKey {
    /// Element id the browser build looks up.
    pub fn dom_id(&self) -> String {
        match self {
            Self::PageRoot => "page-root".to_string(),
            Self::HeroContent => "hero-content".to_string(),
            Self::HeroBackground => "hero-background".to_string(),
            Self::HeroBlur => "hero-blur".to_string(),
            Self::HeroLeft => "hero-left".to_string(),
            Self::HeroRight => "hero-right".to_string(),
            Self::HeroGrid => "hero-grid".to_string(),
            Self::DeckStage => "deck-stage".to_string(),
            Self::DeckFlankLeft => "deck-flank-left".to_string(),
            Self::DeckFlankRight => "deck-flank-right".to_string(),
            Self::DeckCard(index) => format!("deck-card-{index}"),
            Self::DeckPip(index) => format!("deck-pip-{index}"),
            Self::Loader => "hero-loader".to_string(),
        }
    }

    /// Vertical base the DOM transform keeps under the translation. Cards
    /// are centred in the stage by their own half height.
    pub fn css_base_y(&self) -> Option<&'static str> {
        match self {
            Self::DeckCard(_) => Some("-50%"),
            _ => None,
        }
    }
}

/// Partial style update. `None` fields are left as they are.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewStyle {
    pub translate: Option<Vec2>,
    pub scale: Option<f32>,
    pub opacity: Option<f32>,
    /// Alpha of a white fill, used by the deck pips.
    pub fill_alpha: Option<f32>,
    pub visible: Option<bool>,
}

impl ViewStyle {
    pub fn translate(mut self, x: f32, y: f32) -> Self {
        self.translate = Some(Vec2::new(x, y));
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(alpha);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Overlay `other` onto `self`; fields set in `other` win.
    pub fn merge(self, other: ViewStyle) -> Self {
        Self {
            translate: other.translate.or(self.translate),
            scale: other.scale.or(self.scale),
            opacity: other.opacity.or(self.opacity),
            fill_alpha: other.fill_alpha.or(self.fill_alpha),
            visible: other.visible.or(self.visible),
        }
    }

    /// CSS `transform` value for `key`, if the update touches the transform
    /// at all.
    pub fn css_transform(&self, key: ViewKey) -> Option<String> {
        if self.translate.is_none() && self.scale.is_none() {
            return None;
        }
        let translate = self.translate.unwrap_or(Vec2::ZERO);
        let y = match key.css_base_y() {
            Some(base) => format!("calc({base} + {:.2}px)", translate.y),
            None => format!("{:.2}px", translate.y),
        };
        let mut css = format!("translate({:.2}px, {y})", translate.x);
        if let Some(scale) = self.scale {
            css.push_str(&format!(" scale({scale:.4})"));
        }
        Some(css)
    }
}

/// Writes collected during one frame, applied in order by the platform sink.
///
/// Repeated writes to one key are merged so the sink touches each handle once.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PendingStyles {
    writes: Vec<(ViewKey, ViewStyle)>,
}

impl PendingStyles {
    pub fn push(&mut self, key: ViewKey, style: ViewStyle) {
        if let Some((_, existing)) = self.writes.iter_mut().find(|(k, _)| *k == key) {
            *existing = existing.merge(style);
        } else {
            self.writes.push((key, style));
        }
    }

    pub fn get(&self, key: ViewKey) -> Option<&ViewStyle> {
        self.writes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, style)| style)
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (ViewKey, ViewStyle)> + '_ {
        self.writes.drain(..)
    }
}

/// Destination for style writes.
pub trait StyleSink {
    fn write(&mut self, key: ViewKey, style: &ViewStyle);
}

/// Flush every pending write into `sink`, leaving the queue empty.
pub fn flush_styles<S: StyleSink>(pending: &mut PendingStyles, sink: &mut S) -> usize {
    let mut written = 0;
    for (key, style) in pending.drain() {
        sink.write(key, &style);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink(Vec<(ViewKey, ViewStyle)>);

    impl StyleSink for RecordingSink {
        fn write(&mut self, key: ViewKey, style: &ViewStyle) {
            self.0.push((key, *style));
        }
    }

    #[test]
    fn repeated_writes_to_one_handle_are_merged() {
        let mut pending = PendingStyles::default();
        pending.push(ViewKey::HeroBlur, ViewStyle::default().opacity(0.4));
        pending.push(ViewKey::HeroBackground, ViewStyle::default().translate(0.0, 12.0));
        pending.push(ViewKey::HeroBackground, ViewStyle::default().opacity(0.8));

        assert_eq!(pending.len(), 2);
        assert_eq!(
            pending.get(ViewKey::HeroBackground),
            Some(&ViewStyle::default().translate(0.0, 12.0).opacity(0.8))
        );
    }

    #[test]
    fn flush_drains_in_insertion_order() {
        let mut pending = PendingStyles::default();
        pending.push(ViewKey::DeckCard(1), ViewStyle::default().scale(0.9));
        pending.push(ViewKey::DeckCard(0), ViewStyle::default().scale(0.8));

        let mut sink = RecordingSink::default();
        assert_eq!(flush_styles(&mut pending, &mut sink), 2);
        assert!(pending.is_empty());
        assert_eq!(sink.0[0].0, ViewKey::DeckCard(1));
        assert_eq!(sink.0[1].0, ViewKey::DeckCard(0));
    }

    #[test]
    fn css_transform_combines_translate_and_scale() {
        let style = ViewStyle::default().translate(0.0, -56.0).scale(0.84);
        assert_eq!(
            style.css_transform(ViewKey::DeckStage).as_deref(),
            Some("translate(0.00px, -56.00px) scale(0.8400)")
        );
        assert_eq!(
            ViewStyle::default().opacity(1.0).css_transform(ViewKey::HeroContent),
            None
        );
    }

    #[test]
    fn card_transforms_stay_centred_on_their_own_height() {
        let style = ViewStyle::default().translate(0.0, -56.0).scale(0.84);
        assert_eq!(
            style.css_transform(ViewKey::DeckCard(0)).as_deref(),
            Some("translate(0.00px, calc(-50% + -56.00px)) scale(0.8400)")
        );
    }

    #[test]
    fn dom_ids_are_indexed_for_cards_and_pips() {
        assert_eq!(ViewKey::DeckCard(3).dom_id(), "deck-card-3");
        assert_eq!(ViewKey::DeckPip(0).dom_id(), "deck-pip-0");
    }
}
