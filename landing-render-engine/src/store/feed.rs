use super::client::{StoreTable, TableRows, decode_rows};
use super::error::StoreError;
use super::records::{EventItem, Testimonial};
use crate::engine::core::config::LandingConfig;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use bevy_common_assets::json::JsonAssetPlugin;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Lists currently shown by the page.
#[derive(Resource, Debug, Default)]
pub struct StoreFeed {
    pub testimonials: Vec<Testimonial>,
    pub events: Vec<EventItem>,
    selected_event: Option<usize>,
}

impl StoreFeed {
    pub fn apply(&mut self, rows: TableRows) {
        match rows {
            TableRows::Testimonials(testimonials) => self.testimonials = testimonials,
            TableRows::Events(events) => {
                // Keep the selection across refreshes when the event survives.
                let selected_id = self.selected_event().map(|event| event.id);
                self.events = events;
                self.selected_event = selected_id
                    .and_then(|id| self.events.iter().position(|event| event.id == id))
                    .or(if self.events.is_empty() { None } else { Some(0) });
            }
        }
    }

    /// Failed fetches show nothing rather than stale rows.
    pub fn clear(&mut self, table: StoreTable) {
        match table {
            StoreTable::Testimonials => self.testimonials.clear(),
            StoreTable::Events => {
                self.events.clear();
                self.selected_event = None;
            }
        }
    }

    pub fn selected_event(&self) -> Option<&EventItem> {
        self.selected_event.and_then(|index| self.events.get(index))
    }

    pub fn select_event(&mut self, id: i64) -> bool {
        match self.events.iter().position(|event| event.id == id) {
            Some(index) => {
                self.selected_event = Some(index);
                true
            }
            None => false,
        }
    }
}

/// Ask for a table to be (re)fetched.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreRefresh {
    pub table: StoreTable,
}

pub type Delivery = (StoreTable, Result<TableRows, StoreError>);

/// Results handed back from async fetches, drained once per frame.
#[derive(Resource, Clone, Default)]
pub struct DeliveryQueue(Arc<Mutex<Vec<Delivery>>>);

impl DeliveryQueue {
    pub fn push(&self, table: StoreTable, result: Result<TableRows, StoreError>) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push((table, result));
        }
    }

    pub fn drain(&self) -> Vec<Delivery> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Bundled copy of both tables for native runs.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub testimonials: Value,
    #[serde(default)]
    pub events: Value,
}

impl StoreSnapshot {
    pub fn decode(&self, table: StoreTable) -> Result<TableRows, StoreError> {
        let rows = match table {
            StoreTable::Testimonials => self.testimonials.clone(),
            StoreTable::Events => self.events.clone(),
        };
        decode_rows(table, rows)
    }
}

fn request_initial_fetch(mut refresh: EventWriter<StoreRefresh>) {
    for table in StoreTable::ALL {
        refresh.write(StoreRefresh { table });
    }
}

fn requested_tables(refresh: &mut EventReader<StoreRefresh>) -> Vec<StoreTable> {
    let mut tables: Vec<StoreTable> = refresh.read().map(|r| r.table).collect();
    tables.sort();
    tables.dedup();
    tables
}

#[cfg(target_arch = "wasm32")]
fn start_fetches(
    mut refresh: EventReader<StoreRefresh>,
    config: Res<LandingConfig>,
    queue: Res<DeliveryQueue>,
) {
    use super::client::{StoreEndpoint, fetch_table};

    let tables = requested_tables(&mut refresh);
    if tables.is_empty() {
        return;
    }

    let Some(endpoint) = StoreEndpoint::from_config(&config) else {
        for table in tables {
            queue.push(
                table,
                Err(StoreError::Unavailable("store url or anon key not set".to_string())),
            );
        }
        return;
    };

    for table in tables {
        let endpoint = endpoint.clone();
        let queue = queue.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_table(endpoint, table).await;
            queue.push(table, result);
        });
    }
}

/// Snapshot handle and the tables waiting on it.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Resource, Default)]
pub struct SnapshotSource {
    handle: Option<Handle<StoreSnapshot>>,
    pending: Vec<StoreTable>,
}

#[cfg(not(target_arch = "wasm32"))]
fn serve_snapshot(
    mut refresh: EventReader<StoreRefresh>,
    mut source: ResMut<SnapshotSource>,
    asset_server: Res<AssetServer>,
    config: Res<LandingConfig>,
    snapshots: Res<Assets<StoreSnapshot>>,
    queue: Res<DeliveryQueue>,
) {
    use bevy::asset::LoadState;

    for table in requested_tables(&mut refresh) {
        if !source.pending.contains(&table) {
            source.pending.push(table);
        }
    }
    if source.pending.is_empty() {
        return;
    }

    let handle = source
        .handle
        .get_or_insert_with(|| asset_server.load(config.snapshot_path.clone()))
        .clone();

    if let Some(snapshot) = snapshots.get(&handle) {
        for table in source.pending.drain(..) {
            queue.push(table, snapshot.decode(table));
        }
    } else if let LoadState::Failed(err) = asset_server.load_state(&handle) {
        for table in source.pending.drain(..) {
            queue.push(
                table,
                Err(StoreError::Unavailable(format!(
                    "snapshot {}: {}",
                    config.snapshot_path, err
                ))),
            );
        }
    }
}

pub fn deliver_results(
    queue: Res<DeliveryQueue>,
    mut feed: ResMut<StoreFeed>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for (table, result) in queue.drain() {
        match result {
            Ok(rows) => {
                let count = rows.len();
                feed.apply(rows);
                info!("Loaded {} {}", count, table.name());
                rpc.send_notification(
                    &format!("{}_loaded", table.name()),
                    serde_json::json!({ "count": count }),
                );
            }
            Err(e) => {
                error!("fetch {} error: {}", table.name(), e);
                feed.clear(table);
            }
        }
    }
}

pub struct StorePlugin;

impl Plugin for StorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StoreFeed>()
            .init_resource::<DeliveryQueue>()
            .init_resource::<LandingConfig>()
            .init_resource::<WebRpcInterface>()
            .add_event::<StoreRefresh>()
            .add_systems(Startup, request_initial_fetch)
            .add_systems(Update, deliver_results);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Update, start_fetches.before(deliver_results));

        #[cfg(not(target_arch = "wasm32"))]
        app.add_plugins(JsonAssetPlugin::<StoreSnapshot>::new(&["json"]))
            .init_resource::<SnapshotSource>()
            .add_systems(Update, serve_snapshot.before(deliver_results));
    }
}
