use crate::engine::signals::readiness::ReadinessSignal;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum HeroState {
    #[default]
    Loading,
    Ready,
    /// Model unavailable; the flat halftone fallback stands in for it.
    Degraded,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    LoadFailed,
    TimedOut,
    Disabled,
}

impl DegradedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadFailed => "load_failed",
            Self::TimedOut => "timed_out",
            Self::Disabled => "disabled",
        }
    }
}

pub fn transition_to_ready(next_state: &mut NextState<HeroState>) {
    println!("→ Hero model loaded, transitioning to Ready state");
    next_state.set(HeroState::Ready);
}

pub fn transition_to_degraded(
    reason: DegradedReason,
    commands: &mut Commands,
    next_state: &mut NextState<HeroState>,
) {
    println!("→ Hero model unavailable ({}), transitioning to Degraded state", reason.as_str());
    commands.insert_resource(reason);
    next_state.set(HeroState::Degraded);
}

/// Ready and Degraded both release everything waiting on the hero.
pub fn release_readiness(signal: Res<ReadinessSignal>) {
    signal.set_ready();
}

pub fn notify_hero_ready(mut rpc: ResMut<WebRpcInterface>) {
    rpc.send_notification("hero_ready", serde_json::json!({}));
}

pub fn notify_hero_degraded(reason: Option<Res<DegradedReason>>, mut rpc: ResMut<WebRpcInterface>) {
    let reason = reason.map(|r| r.as_str()).unwrap_or("unknown");
    rpc.send_notification("hero_degraded", serde_json::json!({ "reason": reason }));
}

pub struct HeroStatePlugin;

impl Plugin for HeroStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<HeroState>()
            .init_resource::<ReadinessSignal>()
            .init_resource::<WebRpcInterface>()
            .add_systems(
                OnEnter(HeroState::Ready),
                (release_readiness, notify_hero_ready),
            )
            .add_systems(
                OnEnter(HeroState::Degraded),
                (release_readiness, notify_hero_degraded),
            );
    }
}
