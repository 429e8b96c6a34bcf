use super::PageSet;
use super::style::{PendingStyles, StyleSink, ViewKey, ViewStyle, flush_styles};
use super::viewport::{PageSignal, PageViewport, ScrollSection, SectionBounds, apply_page_signals};
use crate::engine::carousel::systems::{CarouselTarget, CarouselText};
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::choreography::{DECK_CARD_COUNT, PIP_EMPTY_ALPHA, WHEEL_LINE_PX};
use constants::scene::ACCENT;
use std::collections::HashMap;

/// Entity behind each native view handle.
#[derive(Resource, Default)]
pub struct ViewRegistry {
    entities: HashMap<ViewKey, Entity>,
}

impl ViewRegistry {
    pub fn insert(&mut self, key: ViewKey, entity: Entity) {
        self.entities.insert(key, entity);
    }

    pub fn get(&self, key: ViewKey) -> Option<Entity> {
        self.entities.get(&key).copied()
    }
}

/// Resting position a handle's translation is added to.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct BaseOffset(pub Vec2);

/// Node height in viewport heights.
#[derive(Component, Debug, Clone, Copy)]
pub struct ViewportHeight(pub f32);

/// Vertical base offset in viewport heights.
#[derive(Component, Debug, Clone, Copy)]
pub struct ViewportAnchor(pub f32);

/// Opacity of a handle and, multiplicatively, of everything below it.
#[derive(Component, Debug, Clone, Copy)]
pub struct ViewOpacity(pub f32);

impl Default for ViewOpacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Full-alpha colour of a tinted node; opacity scales its alpha.
#[derive(Component, Debug, Clone, Copy)]
pub struct Tint(pub Color);

type HandleQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Node,
        &'static mut Transform,
        &'static mut Visibility,
        &'static mut ViewOpacity,
        Option<&'static BaseOffset>,
        Option<&'static mut BackgroundColor>,
    ),
>;

/// Writes styles onto registered Bevy UI nodes.
pub struct UiStyleSink<'a, 'w, 's> {
    registry: &'a ViewRegistry,
    handles: &'a mut HandleQuery<'w, 's>,
}

impl StyleSink for UiStyleSink<'_, '_, '_> {
    fn write(&mut self, key: ViewKey, style: &ViewStyle) {
        let Some(entity) = self.registry.get(key) else {
            return;
        };
        let Ok((mut node, mut transform, mut visibility, mut opacity, base, fill)) =
            self.handles.get_mut(entity)
        else {
            return;
        };

        if let Some(translate) = style.translate {
            let base = base.map(|b| b.0).unwrap_or(Vec2::ZERO);
            node.left = Val::Px(base.x + translate.x);
            node.top = Val::Px(base.y + translate.y);
        }
        if let Some(scale) = style.scale {
            transform.scale = Vec3::new(scale, scale, 1.0);
        }
        if let Some(value) = style.opacity {
            opacity.0 = value.clamp(0.0, 1.0);
        }
        if let (Some(alpha), Some(mut fill)) = (style.fill_alpha, fill) {
            fill.0 = Color::WHITE.with_alpha(alpha);
        }
        if let Some(visible) = style.visible {
            *visibility = if visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}

pub fn apply_native_styles(
    mut pending: ResMut<PendingStyles>,
    registry: Res<ViewRegistry>,
    mut handles: HandleQuery,
) {
    if pending.is_empty() {
        return;
    }
    let mut sink = UiStyleSink {
        registry: &registry,
        handles: &mut handles,
    };
    flush_styles(&mut pending, &mut sink);
}

/// Resolve effective opacity (own times every ancestor's) into colour alpha.
pub fn apply_view_opacity(
    changed: Query<(), Changed<ViewOpacity>>,
    opacities: Query<&ViewOpacity>,
    parents: Query<&ChildOf>,
    mut fills: Query<(Entity, &Tint, &mut BackgroundColor), Without<Text>>,
    mut texts: Query<(Entity, &Tint, &mut TextColor), With<Text>>,
) {
    if changed.is_empty() {
        return;
    }

    let effective = |entity: Entity| -> f32 {
        let own = opacities.get(entity).map(|o| o.0).unwrap_or(1.0);
        parents
            .iter_ancestors(entity)
            .filter_map(|ancestor| opacities.get(ancestor).ok())
            .fold(own, |acc, o| acc * o.0)
    };

    for (entity, tint, mut fill) in &mut fills {
        let alpha = tint.0.alpha() * effective(entity);
        fill.0 = tint.0.with_alpha(alpha);
    }
    for (entity, tint, mut color) in &mut texts {
        let alpha = tint.0.alpha() * effective(entity);
        color.0 = tint.0.with_alpha(alpha);
    }
}

/// Turn wheel and window events into page signals.
pub fn collect_native_signals(
    mut wheel: EventReader<MouseWheel>,
    mut resized: EventReader<WindowResized>,
    viewport: Res<PageViewport>,
    mut signals: EventWriter<PageSignal>,
) {
    let mut scroll_y = viewport.scroll_y;
    for event in wheel.read() {
        let step = match event.unit {
            MouseScrollUnit::Line => event.y * WHEEL_LINE_PX,
            MouseScrollUnit::Pixel => event.y,
        };
        // wheel up moves toward the top of the page
        scroll_y = (scroll_y - step).clamp(0.0, viewport.max_scroll());
        signals.write(PageSignal::Scrolled { scroll_y });
    }

    for event in resized.read() {
        signals.write(PageSignal::Resized {
            viewport_height: event.height,
        });
    }
}

const HERO_PILLS: [(&str, &str); 5] = [
    ("1000s", "Mentored"),
    ("Brain 2.0", "Framework"),
    ("MindNext™", "Movement"),
    ("Mentorship over", "Teaching"),
    ("Active Learning", "Methodology"),
];

const HERO_STATS: [(&str, &str, &str); 3] = [
    ("Global Patents", "100+", "Granted Patents in 4 Continents"),
    ("Global Publications", "50+", "By Internationally Reputed Publishers"),
    ("Unique Programs", "4", "Industry-Aligned Learning Tracks"),
];

/// Resting top of each card within the stage.
const CARD_TOP_VIEWPORTS: f32 = 0.25;

const DECK_CARDS: [(&str, &str); DECK_CARD_COUNT] = [
    ("Foundation", "World's 1st Inventor-creation Mentorship Institute"),
    ("Methodology", "Brain 2.0 Framework"),
    ("Movement", "MindNext™ — Think Before You Build"),
    ("Mentorship", "Mentorship Over Teaching"),
    ("Research", "Global Publications & Impact"),
];

fn text(value: &str, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(value),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Tint(color),
    )
}

/// Spawn a handle node and register it under `key`.
fn handle(
    parent: &mut ChildSpawnerCommands,
    registry: &mut ViewRegistry,
    key: ViewKey,
    node: Node,
    extra: impl Bundle,
) -> Entity {
    let entity = parent
        .spawn((node, key, ViewOpacity::default(), extra))
        .id();
    registry.insert(key, entity);
    entity
}

pub fn spawn_native_page(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut signals: EventWriter<PageSignal>,
) {
    let viewport_height = windows
        .single()
        .map(|window| window.resolution.height())
        .unwrap_or(PageViewport::default().viewport_height);

    let mut registry = ViewRegistry::default();

    let root = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            ViewKey::PageRoot,
            ViewOpacity::default(),
        ))
        .id();
    registry.insert(ViewKey::PageRoot, root);

    commands.entity(root).with_children(|page| {
        page.spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(ScrollSection::Hero.height(viewport_height)),
                ..default()
            },
            ViewportHeight(ScrollSection::Hero.height(1.0)),
            ScrollSection::Hero,
            SectionBounds {
                top: ScrollSection::Hero.stacked_top(viewport_height),
            },
        ))
        .with_children(|hero| spawn_hero(hero, &mut registry));

        page.spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(ScrollSection::CardDeck.height(viewport_height)),
                ..default()
            },
            ViewportHeight(ScrollSection::CardDeck.height(1.0)),
            BackgroundColor(ACCENT),
            ScrollSection::CardDeck,
            SectionBounds {
                top: ScrollSection::CardDeck.stacked_top(viewport_height),
            },
        ))
        .with_children(|deck| spawn_deck(deck, &mut registry, viewport_height));

        page.spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(viewport_height),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(32.0)),
                row_gap: Val::Px(16.0),
                ..default()
            },
            ViewportHeight(1.0),
            BackgroundColor(Color::WHITE),
        ))
        .with_children(|section| spawn_carousel_panels(section));
    });

    let loader = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            GlobalZIndex(100),
            BackgroundColor(Color::WHITE),
            Tint(Color::WHITE),
            ViewKey::Loader,
            ViewOpacity::default(),
        ))
        .with_children(|loader| {
            loader.spawn(text("Dr. Madhan Institute of Future", 28.0, ACCENT));
        })
        .id();
    registry.insert(ViewKey::Loader, loader);

    commands.insert_resource(registry);

    signals.write(PageSignal::Resized { viewport_height });
    signals.write(PageSignal::Scrolled { scroll_y: 0.0 });
}

fn spawn_hero(hero: &mut ChildSpawnerCommands, registry: &mut ViewRegistry) {
    handle(
        hero,
        registry,
        ViewKey::HeroBackground,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        (),
    );

    handle(
        hero,
        registry,
        ViewKey::HeroBlur,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(50.0),
            height: Val::Percent(100.0),
            ..default()
        },
        (
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.08)),
            Tint(Color::srgba(1.0, 1.0, 1.0, 0.08)),
        ),
    );

    let content = handle(
        hero,
        registry,
        ViewKey::HeroContent,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceBetween,
            padding: UiRect::axes(Val::Px(64.0), Val::Px(32.0)),
            ..default()
        },
        (),
    );

    let mut left = Entity::PLACEHOLDER;
    let mut right = Entity::PLACEHOLDER;
    let mut grid = Entity::PLACEHOLDER;
    hero.commands().entity(content).with_children(|content| {
        content
            .spawn(Node {
                flex_grow: 1.0,
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|row| {
                left = handle(
                    row,
                    registry,
                    ViewKey::HeroLeft,
                    Node {
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(24.0),
                        ..default()
                    },
                    (),
                );
                right = handle(
                    row,
                    registry,
                    ViewKey::HeroRight,
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::End,
                        row_gap: Val::Px(16.0),
                        ..default()
                    },
                    (),
                );
            });

        grid = handle(
            content,
            registry,
            ViewKey::HeroGrid,
            Node {
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(24.0),
                ..default()
            },
            (),
        );
    });

    hero.commands().entity(left).with_children(|left| {
        left.spawn(text("Dr. Madhan\nInstitute of Future", 56.0, Color::WHITE));
        left.spawn(text(
            "Founded by an IIM Calcutta Alumnus and a globally\nrecognized inventor and technologist.",
            20.0,
            Color::WHITE,
        ));
    });

    hero.commands().entity(right).with_children(|right| {
        for (highlight, label) in HERO_PILLS {
            right
                .spawn((
                    Node {
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        column_gap: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(Color::WHITE),
                    Tint(Color::WHITE),
                ))
                .with_children(|pill| {
                    pill.spawn(text(highlight, 16.0, ACCENT));
                    pill.spawn(text(label, 16.0, Color::BLACK));
                });
        }
    });

    hero.commands().entity(grid).with_children(|grid| {
        for (title, value, description) in HERO_STATS {
            grid.spawn((
                Node {
                    flex_grow: 1.0,
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                },
                BackgroundColor(Color::WHITE),
                Tint(Color::WHITE),
            ))
            .with_children(|stat| {
                stat.spawn(text(title, 16.0, Color::srgb(0.17, 0.17, 0.17)));
                stat.spawn(text(value, 20.0, ACCENT));
                stat.spawn(text(description, 16.0, Color::srgb(0.17, 0.17, 0.17)));
            });
        }
    });
}

fn spawn_deck(deck: &mut ChildSpawnerCommands, registry: &mut ViewRegistry, viewport_height: f32) {
    let stage = handle(
        deck,
        registry,
        ViewKey::DeckStage,
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(viewport_height),
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            padding: UiRect::axes(Val::Px(64.0), Val::Px(0.0)),
            ..default()
        },
        ViewportHeight(1.0),
    );

    deck.commands().entity(stage).with_children(|stage| {
        let flank_left = handle(
            stage,
            registry,
            ViewKey::DeckFlankLeft,
            Node {
                width: Val::Percent(28.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            (),
        );
        stage.commands().entity(flank_left).with_children(|flank| {
            flank.spawn(text("About DMIF", 40.0, Color::WHITE));
        });

        stage
            .spawn(Node {
                width: Val::Percent(36.0),
                height: Val::Percent(100.0),
                ..default()
            })
            .with_children(|cards| {
                let card_top = viewport_height * CARD_TOP_VIEWPORTS;
                for (index, (tag, title)) in DECK_CARDS.iter().enumerate() {
                    let card = handle(
                        cards,
                        registry,
                        ViewKey::DeckCard(index),
                        Node {
                            position_type: PositionType::Absolute,
                            width: Val::Percent(100.0),
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(16.0),
                            padding: UiRect::all(Val::Px(24.0)),
                            ..default()
                        },
                        (
                            BaseOffset(Vec2::new(0.0, card_top)),
                            ViewportAnchor(CARD_TOP_VIEWPORTS),
                            BackgroundColor(Color::WHITE),
                            Tint(Color::WHITE),
                        ),
                    );
                    cards.commands().entity(card).with_children(|card| {
                        card.spawn(text(tag, 12.0, ACCENT));
                        card.spawn(text(title, 20.0, ACCENT));
                    });
                }
            });

        let flank_right = handle(
            stage,
            registry,
            ViewKey::DeckFlankRight,
            Node {
                width: Val::Percent(28.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                row_gap: Val::Px(12.0),
                ..default()
            },
            (),
        );
        stage.commands().entity(flank_right).with_children(|flank| {
            for index in 0..DECK_CARD_COUNT {
                let pip = flank
                    .spawn((
                        Node {
                            width: Val::Px(8.0),
                            height: Val::Px(8.0),
                            ..default()
                        },
                        BackgroundColor(Color::WHITE.with_alpha(PIP_EMPTY_ALPHA)),
                        ViewKey::DeckPip(index),
                        ViewOpacity::default(),
                    ))
                    .id();
                registry.insert(ViewKey::DeckPip(index), pip);
            }
        });
    });
}

fn spawn_carousel_panels(section: &mut ChildSpawnerCommands) {
    section.spawn(text(
        "Transformations Powered by DMIF",
        40.0,
        Color::srgb(0.07, 0.07, 0.07),
    ));
    section.spawn((
        text("", 18.0, Color::srgb(0.27, 0.27, 0.27)),
        CarouselText(CarouselTarget::Testimonials),
        Interaction::default(),
    ));
    section.spawn(text("Activities", 32.0, Color::srgb(0.07, 0.07, 0.07)));
    section.spawn((
        text("", 18.0, Color::srgb(0.27, 0.27, 0.27)),
        CarouselText(CarouselTarget::Gallery),
        Interaction::default(),
    ));
}

/// Re-derive viewport-relative heights and offsets after a resize. The
/// resize also requested a frame, so cards are restyled on the new base.
pub fn fit_page_to_viewport(
    viewport: Res<PageViewport>,
    mut sized: Query<(&ViewportHeight, &mut Node)>,
    mut anchored: Query<(&ViewportAnchor, &mut BaseOffset)>,
) {
    let vh = viewport.viewport_height;

    for (factor, mut node) in &mut sized {
        let height = Val::Px(factor.0 * vh);
        if node.height != height {
            node.height = height;
        }
    }

    for (anchor, mut base) in &mut anchored {
        let top = anchor.0 * vh;
        if base.0.y != top {
            base.0.y = top;
        }
    }
}

pub struct NativePagePlugin;

impl Plugin for NativePagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewRegistry>()
            .add_systems(Startup, spawn_native_page)
            .add_systems(
                Update,
                (
                    collect_native_signals
                        .in_set(PageSet::Input)
                        .before(apply_page_signals),
                    fit_page_to_viewport
                        .in_set(PageSet::Input)
                        .after(apply_page_signals)
                        .run_if(resource_changed::<PageViewport>),
                    (apply_native_styles, apply_view_opacity)
                        .chain()
                        .in_set(PageSet::Apply),
                ),
            );
    }
}
