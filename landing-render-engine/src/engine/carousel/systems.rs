use super::state::{Carousel, Step};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::store::feed::StoreFeed;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselTarget {
    Testimonials,
    Gallery,
}

impl CarouselTarget {
    pub const ALL: [CarouselTarget; 2] = [CarouselTarget::Testimonials, CarouselTarget::Gallery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testimonials => "testimonials",
            Self::Gallery => "gallery",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.as_str() == name)
    }
}

/// Text node showing a carousel's current item (native page).
#[derive(Component, Debug, Clone, Copy)]
pub struct CarouselText(pub CarouselTarget);

#[derive(Resource, Debug)]
pub struct Carousels {
    pub testimonials: Carousel,
    pub gallery: Carousel,
    /// Ids of the testimonials the carousel was last reset for.
    testimonial_ids: Vec<i64>,
    /// Event and image list the gallery is showing.
    gallery_source: Option<(i64, Vec<String>)>,
}

impl Default for Carousels {
    fn default() -> Self {
        Self {
            testimonials: Carousel::testimonials(),
            gallery: Carousel::gallery(),
            testimonial_ids: Vec::new(),
            gallery_source: None,
        }
    }
}

impl Carousels {
    pub fn get(&self, target: CarouselTarget) -> &Carousel {
        match target {
            CarouselTarget::Testimonials => &self.testimonials,
            CarouselTarget::Gallery => &self.gallery,
        }
    }

    pub fn get_mut(&mut self, target: CarouselTarget) -> &mut Carousel {
        match target {
            CarouselTarget::Testimonials => &mut self.testimonials,
            CarouselTarget::Gallery => &mut self.gallery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselAction {
    Next,
    Prev,
    GoTo(usize),
    Pause,
    Resume,
    ToggleExpanded,
}

impl CarouselAction {
    pub fn parse(action: &str, index: Option<usize>) -> Option<Self> {
        match action {
            "next" => Some(Self::Next),
            "prev" => Some(Self::Prev),
            "go_to" => index.map(Self::GoTo),
            "pause" => Some(Self::Pause),
            "resume" => Some(Self::Resume),
            "toggle_expanded" => Some(Self::ToggleExpanded),
            _ => None,
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselCommand {
    pub target: CarouselTarget,
    pub action: CarouselAction,
}

fn notify_step(rpc: &mut WebRpcInterface, target: CarouselTarget, step: Step) {
    rpc.send_notification(
        "carousel_changed",
        serde_json::json!({
            "carousel": target.as_str(),
            "index": step.to,
            "direction": step.direction.as_str(),
        }),
    );
}

/// Reset carousels when their data set changes, even at equal length.
/// A different selected event restarts the gallery at its first image.
pub fn sync_carousel_lengths(feed: Res<StoreFeed>, mut carousels: ResMut<Carousels>) {
    if !feed.is_changed() {
        return;
    }

    let ids: Vec<i64> = feed.testimonials.iter().map(|t| t.id).collect();
    if ids != carousels.testimonial_ids {
        carousels.testimonials.set_len(ids.len());
        carousels.testimonial_ids = ids;
    }

    let source = feed
        .selected_event()
        .map(|event| (event.id, event.images.clone()));
    if source != carousels.gallery_source {
        let image_count = source.as_ref().map_or(0, |(_, images)| images.len());
        carousels.gallery.set_len(image_count);
        carousels.gallery_source = source;
    }
}

pub fn apply_carousel_commands(
    mut commands: EventReader<CarouselCommand>,
    mut carousels: ResMut<Carousels>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for command in commands.read() {
        let carousel = carousels.get_mut(command.target);
        let step = match command.action {
            CarouselAction::Next => carousel.handle_next(),
            CarouselAction::Prev => carousel.handle_prev(),
            CarouselAction::GoTo(index) => carousel.go_to(index),
            CarouselAction::Pause => {
                carousel.pause();
                None
            }
            CarouselAction::Resume => {
                carousel.resume();
                None
            }
            CarouselAction::ToggleExpanded => {
                carousel.toggle_expanded();
                None
            }
        };
        if let Some(step) = step {
            notify_step(&mut rpc, command.target, step);
        }
    }
}

pub fn tick_carousels(
    time: Res<Time>,
    mut carousels: ResMut<Carousels>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for target in CarouselTarget::ALL {
        if let Some(step) = carousels.get_mut(target).tick(time.delta()) {
            notify_step(&mut rpc, target, step);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
const COLLAPSED_CHARS: usize = 180;

#[cfg(not(target_arch = "wasm32"))]
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn testimonial_caption(feed: &StoreFeed, carousel: &Carousel) -> String {
    let Some(testimonial) = carousel.current().and_then(|i| feed.testimonials.get(i)) else {
        return String::new();
    };

    let body = if carousel.is_expanded() {
        testimonial.text.clone()
    } else {
        truncate(&testimonial.text, COLLAPSED_CHARS)
    };
    let mut caption = format!("\"{}\"\n{}", body, testimonial.name);
    if let Some(role) = testimonial.patent.as_deref().or(testimonial.position.as_deref()) {
        caption.push_str(&format!(" · {role}"));
    }

    if !testimonial.outcomes.is_empty() {
        let labels: Vec<&str> = testimonial
            .outcomes
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        caption.push_str(&format!("\nOutcomes: {}", labels.join(", ")));
    }

    let earlier: Vec<&str> = carousel
        .thumbnails()
        .into_iter()
        .filter_map(|i| feed.testimonials.get(i))
        .map(|t| t.name.as_str())
        .collect();
    if !earlier.is_empty() {
        caption.push_str(&format!("\nAlso: {}", earlier.join(", ")));
    }
    caption
}

#[cfg(not(target_arch = "wasm32"))]
pub fn gallery_caption(feed: &StoreFeed, carousel: &Carousel) -> String {
    let Some(event) = feed.selected_event() else {
        return String::new();
    };
    let mut caption = format!("{} · {} · {}", event.title, event.location, event.event_date);
    if let Some(index) = carousel.current() {
        if let Some(image) = event.images.get(index) {
            caption.push_str(&format!("\n{}/{}  {}", index + 1, event.images.len(), image));
        }
    }
    caption
}

#[cfg(not(target_arch = "wasm32"))]
pub fn update_carousel_text(
    carousels: Res<Carousels>,
    feed: Res<StoreFeed>,
    mut texts: Query<(&CarouselText, &mut Text)>,
) {
    for (marker, mut text) in &mut texts {
        let caption = match marker.0 {
            CarouselTarget::Testimonials => testimonial_caption(&feed, &carousels.testimonials),
            CarouselTarget::Gallery => gallery_caption(&feed, &carousels.gallery),
        };
        if text.0 != caption {
            text.0 = caption;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pause_on_hover(
    interactions: Query<(&Interaction, &CarouselText), Changed<Interaction>>,
    mut commands: EventWriter<CarouselCommand>,
) {
    for (interaction, marker) in &interactions {
        let action = match interaction {
            Interaction::Hovered | Interaction::Pressed => CarouselAction::Pause,
            Interaction::None => CarouselAction::Resume,
        };
        commands.write(CarouselCommand {
            target: marker.0,
            action,
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn carousel_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<CarouselCommand>,
) {
    let bindings = [
        (KeyCode::ArrowRight, CarouselTarget::Testimonials, CarouselAction::Next),
        (KeyCode::ArrowLeft, CarouselTarget::Testimonials, CarouselAction::Prev),
        (KeyCode::Enter, CarouselTarget::Testimonials, CarouselAction::ToggleExpanded),
        (KeyCode::BracketRight, CarouselTarget::Gallery, CarouselAction::Next),
        (KeyCode::BracketLeft, CarouselTarget::Gallery, CarouselAction::Prev),
    ];
    for (key, target, action) in bindings {
        if keyboard.just_pressed(key) {
            commands.write(CarouselCommand { target, action });
        }
    }
}

pub struct CarouselPlugin;

impl Plugin for CarouselPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Carousels>()
            .init_resource::<StoreFeed>()
            .init_resource::<WebRpcInterface>()
            .add_event::<CarouselCommand>()
            .add_systems(
                Update,
                (sync_carousel_lengths, apply_carousel_commands, tick_carousels).chain(),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(
            Update,
            (
                (carousel_keyboard_shortcuts, pause_on_hover).before(apply_carousel_commands),
                update_carousel_text.after(tick_carousels),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::client::TableRows;
    use crate::store::records::{EventItem, Testimonial};
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn testimonial(id: i64, name: &str) -> Testimonial {
        Testimonial {
            id,
            name: name.to_string(),
            patent: None,
            position: Some("Student".to_string()),
            text: "Hands-on mentorship.".to_string(),
            image: String::new(),
            outcomes: vec![],
            created_at: String::new(),
        }
    }

    fn event(id: i64, images: usize) -> EventItem {
        EventItem {
            id,
            title: format!("Event {id}"),
            description: String::new(),
            location: "Chennai".to_string(),
            images: (0..images).map(|i| format!("/e{id}/{i}.jpg")).collect(),
            event_date: "2025-01-01".to_string(),
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<StoreFeed>()
            .init_resource::<WebRpcInterface>()
            .init_resource::<Carousels>()
            .add_event::<CarouselCommand>()
            .add_systems(
                Update,
                (sync_carousel_lengths, apply_carousel_commands, tick_carousels).chain(),
            );
        app
    }

    #[test]
    fn empty_feed_arms_nothing() {
        let mut app = app();
        app.update();
        let carousels = app.world().resource::<Carousels>();
        assert!(!carousels.testimonials.is_timer_armed());
        assert!(!carousels.gallery.is_timer_armed());
    }

    #[test]
    fn commands_move_the_carousel_and_notify_the_host() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<StoreFeed>()
            .apply(TableRows::Testimonials(vec![
                testimonial(1, "A"),
                testimonial(2, "B"),
                testimonial(3, "C"),
            ]));
        app.update();
        assert!(app.world().resource::<Carousels>().testimonials.is_timer_armed());

        app.world_mut().send_event(CarouselCommand {
            target: CarouselTarget::Testimonials,
            action: CarouselAction::Prev,
        });
        app.update();

        let carousels = app.world().resource::<Carousels>();
        assert_eq!(carousels.testimonials.current(), Some(2));
        let sent = app.world().resource::<WebRpcInterface>().pending_notifications();
        assert!(sent.iter().any(|n| n.method == "carousel_changed"
            && n.params["carousel"] == "testimonials"
            && n.params["index"] == 2
            && n.params["direction"] == "backward"));
    }

    #[test]
    fn refetch_with_other_testimonials_of_equal_length_restarts_at_first() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<StoreFeed>()
            .apply(TableRows::Testimonials(vec![
                testimonial(1, "A"),
                testimonial(2, "B"),
                testimonial(3, "C"),
            ]));
        app.update();

        app.world_mut().send_event(CarouselCommand {
            target: CarouselTarget::Testimonials,
            action: CarouselAction::GoTo(2),
        });
        app.update();
        assert_eq!(app.world().resource::<Carousels>().testimonials.current(), Some(2));

        app.world_mut()
            .resource_mut::<StoreFeed>()
            .apply(TableRows::Testimonials(vec![
                testimonial(7, "G"),
                testimonial(8, "H"),
                testimonial(9, "I"),
            ]));
        app.update();

        let testimonials = &app.world().resource::<Carousels>().testimonials;
        assert_eq!(testimonials.current(), Some(0));
        assert!(testimonials.is_timer_armed());
    }

    #[test]
    fn refetch_with_the_same_testimonials_keeps_the_position() {
        let mut app = app();
        let rows = || {
            TableRows::Testimonials(vec![testimonial(1, "A"), testimonial(2, "B")])
        };
        app.world_mut().resource_mut::<StoreFeed>().apply(rows());
        app.update();

        app.world_mut().send_event(CarouselCommand {
            target: CarouselTarget::Testimonials,
            action: CarouselAction::Next,
        });
        app.update();

        app.world_mut().resource_mut::<StoreFeed>().apply(rows());
        app.update();
        assert_eq!(app.world().resource::<Carousels>().testimonials.current(), Some(1));
    }

    #[test]
    fn selecting_another_event_restarts_the_gallery() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<StoreFeed>()
            .apply(TableRows::Events(vec![event(1, 3), event(2, 2)]));
        app.update();

        app.world_mut().send_event(CarouselCommand {
            target: CarouselTarget::Gallery,
            action: CarouselAction::GoTo(2),
        });
        app.update();
        assert_eq!(app.world().resource::<Carousels>().gallery.current(), Some(2));

        assert!(app.world_mut().resource_mut::<StoreFeed>().select_event(2));
        app.update();
        let gallery = &app.world().resource::<Carousels>().gallery;
        assert_eq!(gallery.current(), Some(0));
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn event_without_images_arms_no_gallery_timer() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<StoreFeed>()
            .apply(TableRows::Events(vec![event(1, 0)]));
        app.update();
        assert!(!app.world().resource::<Carousels>().gallery.is_timer_armed());
    }

    #[test]
    fn actions_parse_from_host_names() {
        assert_eq!(CarouselAction::parse("next", None), Some(CarouselAction::Next));
        assert_eq!(CarouselAction::parse("go_to", Some(4)), Some(CarouselAction::GoTo(4)));
        assert_eq!(CarouselAction::parse("go_to", None), None);
        assert_eq!(CarouselAction::parse("shuffle", None), None);
    }

    #[test]
    fn collapsed_caption_truncates_long_text() {
        let mut feed = StoreFeed::default();
        let mut long = testimonial(1, "A");
        long.text = "word ".repeat(100);
        feed.apply(TableRows::Testimonials(vec![long, testimonial(2, "B")]));

        let mut carousel = Carousel::testimonials();
        carousel.set_len(2);
        let collapsed = testimonial_caption(&feed, &carousel);
        assert!(collapsed.contains('…'));
        assert!(collapsed.contains("Also: B"));

        carousel.toggle_expanded();
        let expanded = testimonial_caption(&feed, &carousel);
        assert!(!expanded.contains('…'));
    }
}
