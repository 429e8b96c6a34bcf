use super::style::{PendingStyles, ViewKey, ViewStyle};
use crate::engine::choreography::intro::{HERO_INTRO, IntroLayer, IntroSample, intro_finished};
use crate::engine::signals::readiness::{ReadinessSignal, Unsubscribe};
use bevy::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn layer_key(layer: IntroLayer) -> ViewKey {
    match layer {
        IntroLayer::Background => ViewKey::HeroBackground,
        IntroLayer::Blur => ViewKey::HeroBlur,
        IntroLayer::LeftColumn => ViewKey::HeroLeft,
        IntroLayer::RightColumn => ViewKey::HeroRight,
        IntroLayer::StatsGrid => ViewKey::HeroGrid,
    }
}

fn sample_style(sample: IntroSample) -> ViewStyle {
    let style = ViewStyle::default().opacity(sample.opacity);
    if sample.moves {
        style.translate(sample.offset.x, sample.offset.y)
    } else {
        style
    }
}

/// Hero entrance timeline. Idle until the readiness signal fires.
#[derive(Resource)]
pub struct HeroIntro {
    fired: Arc<AtomicBool>,
    elapsed: Option<Duration>,
    done: bool,
    subscription: Option<Unsubscribe>,
}

impl HeroIntro {
    pub fn subscribe(signal: &ReadinessSignal) -> Self {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let subscription = signal.on_ready(move || flag.store(true, Ordering::SeqCst));
        Self {
            fired,
            elapsed: None,
            done: false,
            subscription: Some(subscription),
        }
    }

    pub fn is_running(&self) -> bool {
        self.elapsed.is_some() && !self.done
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Stop waiting for readiness, e.g. when the hero is torn down early.
    pub fn cancel(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.done = true;
    }

    /// Advance by `delta` and push the frame's styles. Returns whether any
    /// styles were written.
    pub fn advance(&mut self, delta: Duration, pending: &mut PendingStyles) -> bool {
        if self.done {
            return false;
        }

        let elapsed = match self.elapsed {
            Some(elapsed) => elapsed + delta,
            None if self.fired.load(Ordering::SeqCst) => Duration::ZERO,
            None => return false,
        };
        self.elapsed = Some(elapsed);

        for (layer, track) in HERO_INTRO.iter() {
            pending.push(layer_key(*layer), sample_style(track.sample(elapsed)));
        }

        if intro_finished(elapsed) {
            self.done = true;
            self.subscription = None;
            println!("→ Hero intro complete");
        }
        true
    }
}

/// Push every intro layer's resting pose so nothing flashes before readiness.
pub fn push_initial_intro_styles(pending: &mut PendingStyles) {
    for (layer, track) in HERO_INTRO.iter() {
        pending.push(layer_key(*layer), sample_style(track.initial()));
    }
}

fn setup_hero_intro(
    mut commands: Commands,
    signal: Res<ReadinessSignal>,
    mut pending: ResMut<PendingStyles>,
) {
    push_initial_intro_styles(&mut pending);
    commands.insert_resource(HeroIntro::subscribe(&signal));
}

pub fn advance_hero_intro(
    time: Res<Time>,
    intro: Option<ResMut<HeroIntro>>,
    mut pending: ResMut<PendingStyles>,
) {
    let Some(mut intro) = intro else {
        return;
    };
    intro.advance(time.delta(), &mut pending);
}

pub struct HeroIntroPlugin;

impl Plugin for HeroIntroPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReadinessSignal>()
            .add_systems(Startup, setup_hero_intro);
    }
}
