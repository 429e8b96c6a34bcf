use crate::engine::carousel::systems::{CarouselAction, CarouselCommand, CarouselTarget};
use crate::engine::core::app_state::HeroState;
use crate::engine::signals::readiness::ReadinessSignal;
use crate::engine::signals::scroll_cursor::ScrollCursor;
use crate::store::client::StoreTable;
use crate::store::feed::{StoreFeed, StoreRefresh};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing traffic to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
    echoes: EchoFilter,
}

const MAX_PENDING_ECHOES: usize = 64;

/// Messages posted to our own window, awaiting their return through the
/// `message` listener. Only active when the page is not embedded.
#[derive(Debug, Default)]
struct EchoFilter {
    enabled: bool,
    posted: VecDeque<String>,
}

impl EchoFilter {
    fn record(&mut self, json: &str) {
        if !self.enabled {
            return;
        }
        if self.posted.len() == MAX_PENDING_ECHOES {
            self.posted.pop_front();
        }
        self.posted.push_back(json.to_string());
    }

    /// True if `content` is one of our own posts coming back.
    fn consume(&mut self, content: &str) -> bool {
        match self.posted.iter().position(|posted| posted == content) {
            Some(index) => {
                self.posted.remove(index);
                true
            }
            None => false,
        }
    }
}

impl WebRpcInterface {
    /// Send notification to the host without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications not yet flushed.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the postMessage bridge to the host page.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<StoreFeed>()
            .init_resource::<ScrollCursor>()
            .init_resource::<ReadinessSignal>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<CarouselCommand>()
            .add_event::<StoreRefresh>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(world: &mut World) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Only string payloads that look like JSON-RPC are queued.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Not embedded: `parent` is this window and our posts come back to us.
    let embedded = window
        .parent()
        .ok()
        .flatten()
        .is_some_and(|parent| !js_sys::Object::is(&parent, &window));
    if let Some(mut rpc_interface) = world.get_resource_mut::<WebRpcInterface>() {
        rpc_interface.echoes.enabled = !embedded;
    }

    world.insert_resource(MessageQueue(message_queue));
    world.insert_non_send_resource(MessageListener { window, closure });
}

/// Registered `message` listener, removed when dropped.
#[cfg(target_arch = "wasm32")]
struct MessageListener {
    window: web_sys::Window,
    closure: Closure<dyn FnMut(MessageEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for MessageListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("message", self.closure.as_ref().unchecked_ref());
    }
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut carousel_commands: EventWriter<CarouselCommand>,
    mut store_refresh: EventWriter<StoreRefresh>,
    mut feed: ResMut<StoreFeed>,
    hero_state: Option<Res<State<HeroState>>>,
    readiness: Res<ReadinessSignal>,
    cursor: Res<ScrollCursor>,
) {
    for event in events.read() {
        if rpc_interface.echoes.consume(&event.content) {
            continue;
        }
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let Some(id) = request.id.clone() else {
            handle_rpc_notification(&request, &mut store_refresh);
            continue;
        };

        let result = match request.method.as_str() {
            "carousel_command" => handle_carousel_command(&request.params, &mut carousel_commands),
            "select_event" => handle_select_event(&request.params, &mut feed),
            "get_hero_state" => Ok(hero_state_json(
                hero_state.as_ref().map(|s| *s.get()),
                &readiness,
                &cursor,
            )),
            _ => {
                warn!("Unknown RPC method: {}", request.method);
                rpc_interface.queue_response(create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                ));
                continue;
            }
        };

        let response = match result {
            Ok(result_value) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: Some(result_value),
                error: None,
                id: Some(id),
            },
            Err(error) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: None,
                error: Some(error),
                id: Some(id),
            },
        };
        rpc_interface.queue_response(response);
    }
}

fn handle_rpc_notification(request: &RpcRequest, store_refresh: &mut EventWriter<StoreRefresh>) {
    match request.method.as_str() {
        "store_changed" => {
            #[derive(Deserialize)]
            struct StoreChangedParams {
                table: String,
            }

            let Ok(params) = serde_json::from_value::<StoreChangedParams>(request.params.clone())
            else {
                warn!("store_changed without a table");
                return;
            };
            match StoreTable::from_name(&params.table) {
                Some(table) => {
                    info!("Store table changed: {}", params.table);
                    store_refresh.write(StoreRefresh { table });
                }
                None => warn!("store_changed for unknown table: {}", params.table),
            }
        }
        other => warn!("Unknown RPC notification: {}", other),
    }
}

/// Parse and dispatch a carousel command.
fn handle_carousel_command(
    params: &serde_json::Value,
    carousel_commands: &mut EventWriter<CarouselCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct CarouselCommandParams {
        carousel: String,
        action: String,
        index: Option<usize>,
    }

    let command_params = serde_json::from_value::<CarouselCommandParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'carousel' and 'action' parameters"))?;

    let target = CarouselTarget::from_name(&command_params.carousel).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown carousel: {}", command_params.carousel))
    })?;
    let action = CarouselAction::parse(&command_params.action, command_params.index)
        .ok_or_else(|| {
            RpcError::invalid_params(&format!("Invalid action: {}", command_params.action))
        })?;

    carousel_commands.write(CarouselCommand { target, action });

    Ok(serde_json::json!({
        "success": true,
        "carousel": command_params.carousel,
        "action": command_params.action
    }))
}

fn handle_select_event(
    params: &serde_json::Value,
    feed: &mut StoreFeed,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SelectEventParams {
        id: i64,
    }

    let select_params = serde_json::from_value::<SelectEventParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'id' parameter"))?;

    if feed.events.is_empty() {
        return Err(RpcError::internal_error("Events not loaded"));
    }
    if !feed.select_event(select_params.id) {
        return Err(RpcError::invalid_params(&format!(
            "Unknown event: {}",
            select_params.id
        )));
    }

    Ok(serde_json::json!({
        "success": true,
        "id": select_params.id
    }))
}

fn hero_state_json(
    state: Option<HeroState>,
    readiness: &ReadinessSignal,
    cursor: &ScrollCursor,
) -> serde_json::Value {
    let state = match state {
        Some(HeroState::Loading) | None => "loading",
        Some(HeroState::Ready) => "ready",
        Some(HeroState::Degraded) => "degraded",
    };
    serde_json::json!({
        "state": state,
        "ready": readiness.is_ready(),
        "hero_offset": cursor.hero_offset()
    })
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    let rpc = &mut *rpc_interface;
    let notifications = rpc
        .outgoing_notifications
        .drain(..)
        .map(|notification| serde_json::to_string(&notification));
    let responses = rpc
        .outgoing_responses
        .drain(..)
        .map(|response| serde_json::to_string(&response));

    for message in notifications.chain(responses) {
        match message {
            Ok(json) => {
                rpc.echoes.record(&json);
                post_to_host(&json);
            }
            Err(e) => error!("Failed to serialize message: {}", e),
        }
    }
}

/// Post a serialized message to the embedding window.
fn post_to_host(json: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = window() else {
            error!("Window object not available");
            return;
        };
        // Embedded in an iframe the parent is the host; on the page itself
        // `parent` is the window, and listeners there receive it too.
        let target = window.parent().ok().flatten().unwrap_or(window);
        if let Err(e) = target.post_message(&JsValue::from_str(json), "*") {
            error!("Failed to send message to host: {:?}", e);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = json;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::client::TableRows;
    use crate::store::records::EventItem;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .init_resource::<StoreFeed>()
            .init_resource::<ScrollCursor>()
            .init_resource::<ReadinessSignal>()
            .insert_resource(State::new(HeroState::Ready))
            .add_event::<IncomingRpcMessage>()
            .add_event::<CarouselCommand>()
            .add_event::<StoreRefresh>()
            .add_systems(Update, handle_rpc_messages);
        app
    }

    fn send(app: &mut App, message: serde_json::Value) {
        app.world_mut().send_event(IncomingRpcMessage {
            content: message.to_string(),
        });
        app.update();
    }

    fn responses(app: &App) -> Vec<RpcResponse> {
        app.world()
            .resource::<WebRpcInterface>()
            .outgoing_responses
            .clone()
    }

    #[test]
    fn carousel_command_dispatches_an_event() {
        let mut app = app();
        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "carousel_command",
                "params": { "carousel": "gallery", "action": "go_to", "index": 2 },
                "id": 1
            }),
        );

        let commands: Vec<CarouselCommand> = app
            .world_mut()
            .resource_mut::<Events<CarouselCommand>>()
            .drain()
            .collect();
        assert_eq!(
            commands,
            vec![CarouselCommand {
                target: CarouselTarget::Gallery,
                action: CarouselAction::GoTo(2),
            }]
        );
        let responses = responses(&app);
        assert_eq!(responses.len(), 1);
        assert!(responses[0].error.is_none());
    }

    #[test]
    fn invalid_carousel_is_rejected() {
        let mut app = app();
        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "carousel_command",
                "params": { "carousel": "faq", "action": "next" },
                "id": 2
            }),
        );
        let responses = responses(&app);
        assert_eq!(responses[0].error.as_ref().map(|e| e.code), Some(-32602));
    }

    #[test]
    fn unknown_method_is_not_found() {
        let mut app = app();
        send(
            &mut app,
            serde_json::json!({ "jsonrpc": "2.0", "method": "get_fps", "id": 3 }),
        );
        let responses = responses(&app);
        assert_eq!(responses[0].error.as_ref().map(|e| e.code), Some(-32601));
    }

    #[test]
    fn store_changed_triggers_a_refetch() {
        let mut app = app();
        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "store_changed",
                "params": { "table": "testimonials" }
            }),
        );

        let refreshes: Vec<StoreRefresh> = app
            .world_mut()
            .resource_mut::<Events<StoreRefresh>>()
            .drain()
            .collect();
        assert_eq!(
            refreshes,
            vec![StoreRefresh {
                table: StoreTable::Testimonials
            }]
        );
        assert!(responses(&app).is_empty());
    }

    #[test]
    fn select_event_changes_the_feed_selection() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<StoreFeed>()
            .apply(TableRows::Events(vec![
                EventItem {
                    id: 5,
                    title: "Bootcamp".into(),
                    description: String::new(),
                    location: String::new(),
                    images: vec![],
                    event_date: "2025-06-01".into(),
                },
                EventItem {
                    id: 6,
                    title: "Talk".into(),
                    description: String::new(),
                    location: String::new(),
                    images: vec![],
                    event_date: "2025-01-01".into(),
                },
            ]));

        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0", "method": "select_event", "params": { "id": 6 }, "id": 4
            }),
        );
        assert_eq!(
            app.world().resource::<StoreFeed>().selected_event().map(|e| e.id),
            Some(6)
        );

        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0", "method": "select_event", "params": { "id": 99 }, "id": 5
            }),
        );
        assert!(responses(&app)[1].error.is_some());
    }

    #[test]
    fn select_event_before_load_is_an_internal_error() {
        let mut app = app();
        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0", "method": "select_event", "params": { "id": 1 }, "id": 6
            }),
        );
        assert_eq!(
            responses(&app)[0].error.as_ref().map(|e| e.code),
            Some(-32603)
        );
    }

    fn echoing_app() -> App {
        let mut app = app();
        app.add_systems(Update, send_outgoing_messages.after(handle_rpc_messages));
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .echoes
            .enabled = true;
        app
    }

    fn posted(app: &App) -> Vec<String> {
        app.world()
            .resource::<WebRpcInterface>()
            .echoes
            .posted
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn own_posts_coming_back_are_not_dispatched() {
        let mut app = echoing_app();
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .send_notification("carousel_changed", serde_json::json!({ "index": 1 }));
        send(
            &mut app,
            serde_json::json!({ "jsonrpc": "2.0", "method": "get_hero_state", "id": 1 }),
        );
        let echoes = posted(&app);
        assert_eq!(echoes.len(), 2);

        for content in echoes {
            app.world_mut().send_event(IncomingRpcMessage { content });
        }
        app.update();

        assert!(posted(&app).is_empty());
        assert!(responses(&app).is_empty());
    }

    #[test]
    fn host_requests_still_dispatch_while_filtering_echoes() {
        let mut app = echoing_app();
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .send_notification("hero_ready", serde_json::json!({}));
        app.update();
        assert_eq!(posted(&app).len(), 1);

        send(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "carousel_command",
                "params": { "carousel": "gallery", "action": "next" },
                "id": 2
            }),
        );

        let commands = app.world().resource::<Events<CarouselCommand>>();
        assert_eq!(commands.len(), 1);
        assert_eq!(posted(&app).len(), 2);
    }

    #[test]
    fn embedded_pages_record_no_echoes() {
        let mut app = app();
        app.add_systems(Update, send_outgoing_messages.after(handle_rpc_messages));
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .send_notification("hero_ready", serde_json::json!({}));
        app.update();
        assert!(posted(&app).is_empty());
    }

    #[test]
    fn hero_state_reports_readiness() {
        let mut app = app();
        app.world().resource::<ReadinessSignal>().set_ready();
        send(
            &mut app,
            serde_json::json!({ "jsonrpc": "2.0", "method": "get_hero_state", "id": 7 }),
        );

        let result = responses(&app)[0].result.clone().unwrap();
        assert_eq!(result["state"], "ready");
        assert_eq!(result["ready"], true);
    }
}
