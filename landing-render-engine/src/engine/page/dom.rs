use super::PageSet;
use super::style::{PendingStyles, StyleSink, ViewKey, ViewStyle, flush_styles};
use super::viewport::{PageSignal, ScrollSection, SectionBounds, apply_page_signals};
use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window, window};

const SECTIONS: [ScrollSection; 2] = [ScrollSection::Hero, ScrollSection::CardDeck];

type SignalQueue = Arc<Mutex<Vec<PageSignal>>>;

/// Viewport height plus the document top of every section present in the DOM.
fn measure(window: &Window) -> Vec<PageSignal> {
    let mut signals = Vec::with_capacity(SECTIONS.len() + 1);

    if let Some(height) = window.inner_height().ok().and_then(|h| h.as_f64()) {
        signals.push(PageSignal::Resized {
            viewport_height: height as f32,
        });
    }

    let scroll_y = window.scroll_y().unwrap_or(0.0);
    if let Some(document) = window.document() {
        for section in SECTIONS {
            if let Some(element) = document.get_element_by_id(section.dom_id()) {
                let top = element.get_bounding_client_rect().top() + scroll_y;
                signals.push(PageSignal::Measured {
                    section,
                    top: top as f32,
                });
            }
        }
    }

    signals
}

fn push_all(queue: &SignalQueue, signals: impl IntoIterator<Item = PageSignal>) {
    if let Ok(mut queue) = queue.lock() {
        queue.extend(signals);
    }
}

/// Scroll and resize listeners on the window. Dropping this removes both.
pub struct DomPageListeners {
    window: Window,
    queue: SignalQueue,
    on_scroll: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
}

impl DomPageListeners {
    fn install(window: Window) -> Result<Self, JsValue> {
        let queue: SignalQueue = Arc::new(Mutex::new(Vec::new()));

        let scroll_queue = queue.clone();
        let scroll_window = window.clone();
        let on_scroll = Closure::wrap(Box::new(move || {
            let scroll_y = scroll_window.scroll_y().unwrap_or(0.0) as f32;
            push_all(&scroll_queue, [PageSignal::Scrolled { scroll_y }]);
        }) as Box<dyn FnMut()>);

        let resize_queue = queue.clone();
        let resize_window = window.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            push_all(&resize_queue, measure(&resize_window));
        }) as Box<dyn FnMut()>);

        window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        // Initial paint.
        push_all(&queue, measure(&window));
        let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
        push_all(&queue, [PageSignal::Scrolled { scroll_y }]);

        Ok(Self {
            window,
            queue,
            on_scroll,
            on_resize,
        })
    }

    fn drain(&self) -> Vec<PageSignal> {
        self.queue
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

impl Drop for DomPageListeners {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        info!("Page scroll listeners released");
    }
}

/// Writes styles to DOM elements, resolved by id on first use.
pub struct DomStyleSink {
    document: Document,
    elements: HashMap<ViewKey, Option<HtmlElement>>,
}

impl DomStyleSink {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            elements: HashMap::new(),
        }
    }
}

impl StyleSink for DomStyleSink {
    fn write(&mut self, key: ViewKey, style: &ViewStyle) {
        // The document scrolls itself.
        if key == ViewKey::PageRoot {
            return;
        }

        let document = &self.document;
        let element = self.elements.entry(key).or_insert_with(|| {
            document
                .get_element_by_id(&key.dom_id())
                .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        });
        let Some(element) = element else {
            return;
        };

        let css = element.style();
        if let Some(transform) = style.css_transform(key) {
            let _ = css.set_property("transform", &transform);
        }
        if let Some(opacity) = style.opacity {
            let _ = css.set_property("opacity", &format!("{opacity:.4}"));
        }
        if let Some(alpha) = style.fill_alpha {
            let _ = css.set_property("background-color", &format!("rgba(255, 255, 255, {alpha:.3})"));
        }
        match style.visible {
            Some(false) => {
                let _ = css.set_property("display", "none");
            }
            Some(true) => {
                let _ = css.remove_property("display");
            }
            None => {}
        }
    }
}

fn install_dom_page(world: &mut World) {
    let Some(window) = window() else {
        error!("Window object not available");
        return;
    };

    for section in SECTIONS {
        world.spawn((
            Name::new(section.dom_id()),
            section,
            SectionBounds::default(),
        ));
    }

    if let Some(document) = window.document() {
        world.insert_non_send_resource(DomStyleSink::new(document));
    }

    match DomPageListeners::install(window) {
        Ok(listeners) => world.insert_non_send_resource(listeners),
        Err(e) => error!("Failed to register page listeners: {:?}", e),
    }
}

fn drain_dom_signals(
    listeners: Option<NonSend<DomPageListeners>>,
    mut signals: EventWriter<PageSignal>,
) {
    let Some(listeners) = listeners else {
        return;
    };
    for signal in listeners.drain() {
        signals.write(signal);
    }
}

fn apply_dom_styles(mut pending: ResMut<PendingStyles>, sink: Option<NonSendMut<DomStyleSink>>) {
    let Some(mut sink) = sink else {
        return;
    };
    if pending.is_empty() {
        return;
    }
    flush_styles(&mut pending, &mut *sink);
}

/// Remove window listeners once the last scroll section is gone.
fn release_dom_listeners(world: &mut World) {
    let mut sections = world.query::<&ScrollSection>();
    if sections.iter(world).next().is_none() {
        world.remove_non_send_resource::<DomPageListeners>();
    }
}

pub struct DomPagePlugin;

impl Plugin for DomPagePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, install_dom_page).add_systems(
            Update,
            (
                drain_dom_signals
                    .in_set(PageSet::Input)
                    .before(apply_page_signals),
                apply_dom_styles.in_set(PageSet::Apply),
                release_dom_listeners
                    .after(PageSet::Apply)
                    .run_if(any_component_removed::<ScrollSection>),
            ),
        );
    }
}
