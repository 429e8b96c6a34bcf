use super::style::{PendingStyles, ViewKey, ViewStyle};
use crate::engine::signals::readiness::{ReadinessSignal, Unsubscribe};
use bevy::prelude::*;
use constants::timing::{LOADER_FADE_MS, LOADER_MIN_VISIBLE_MS};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Visible,
    FadingOut { elapsed: Duration },
    Hidden,
}

/// Loader overlay that stays up for a minimum time and until readiness.
#[derive(Resource)]
pub struct LoaderGate {
    min_visible: Duration,
    fade: Duration,
    shown_for: Duration,
    phase: LoaderPhase,
    ready: Arc<AtomicBool>,
    subscription: Option<Unsubscribe>,
}

impl LoaderGate {
    pub fn new(signal: &ReadinessSignal, min_visible: Duration, fade: Duration) -> Self {
        let ready = Arc::new(AtomicBool::new(false));
        let flag = ready.clone();
        let subscription = signal.on_ready(move || flag.store(true, Ordering::SeqCst));
        Self {
            min_visible,
            fade,
            shown_for: Duration::ZERO,
            phase: LoaderPhase::Visible,
            ready,
            subscription: Some(subscription),
        }
    }

    pub fn phase(&self) -> LoaderPhase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        match self.phase {
            LoaderPhase::Visible => 1.0,
            LoaderPhase::FadingOut { elapsed } if !self.fade.is_zero() => {
                1.0 - (elapsed.as_secs_f32() / self.fade.as_secs_f32()).min(1.0)
            }
            LoaderPhase::FadingOut { .. } | LoaderPhase::Hidden => 0.0,
        }
    }

    pub fn tick(&mut self, delta: Duration) -> LoaderPhase {
        self.phase = match self.phase {
            LoaderPhase::Visible => {
                self.shown_for += delta;
                let ready = self.ready.load(Ordering::SeqCst);
                if ready && self.shown_for >= self.min_visible {
                    LoaderPhase::FadingOut {
                        elapsed: Duration::ZERO,
                    }
                } else {
                    LoaderPhase::Visible
                }
            }
            LoaderPhase::FadingOut { elapsed } => {
                let elapsed = elapsed + delta;
                if elapsed >= self.fade {
                    self.teardown();
                    LoaderPhase::Hidden
                } else {
                    LoaderPhase::FadingOut { elapsed }
                }
            }
            LoaderPhase::Hidden => LoaderPhase::Hidden,
        };
        self.phase
    }

    /// Release the readiness subscription if it never fired.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for LoaderGate {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn setup_loader(mut commands: Commands, signal: Res<ReadinessSignal>) {
    commands.insert_resource(LoaderGate::new(
        &signal,
        Duration::from_millis(LOADER_MIN_VISIBLE_MS),
        Duration::from_millis(LOADER_FADE_MS),
    ));
}

pub fn advance_loader(
    time: Res<Time>,
    gate: Option<ResMut<LoaderGate>>,
    mut pending: ResMut<PendingStyles>,
) {
    let Some(mut gate) = gate else {
        return;
    };

    let before = gate.phase();
    if before == LoaderPhase::Hidden {
        return;
    }

    match gate.tick(time.delta()) {
        LoaderPhase::Visible => {}
        LoaderPhase::FadingOut { .. } => {
            pending.push(ViewKey::Loader, ViewStyle::default().opacity(gate.opacity()));
        }
        LoaderPhase::Hidden => {
            pending.push(
                ViewKey::Loader,
                ViewStyle::default().opacity(0.0).visible(false),
            );
            println!("→ Loader dismissed");
        }
    }
}

pub struct LoaderPlugin;

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReadinessSignal>()
            .add_systems(Startup, setup_loader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn gate(signal: &ReadinessSignal) -> LoaderGate {
        LoaderGate::new(signal, ms(2000), ms(800))
    }

    #[test]
    fn fast_load_still_shows_loader_for_minimum_time() {
        let signal = ReadinessSignal::new();
        let mut loader = gate(&signal);
        signal.set_ready();

        assert_eq!(loader.tick(ms(1500)), LoaderPhase::Visible);
        assert!(matches!(loader.tick(ms(500)), LoaderPhase::FadingOut { .. }));
    }

    #[test]
    fn slow_load_holds_loader_until_ready() {
        let signal = ReadinessSignal::new();
        let mut loader = gate(&signal);

        assert_eq!(loader.tick(ms(5000)), LoaderPhase::Visible);
        signal.set_ready();
        assert!(matches!(loader.tick(ms(16)), LoaderPhase::FadingOut { .. }));
    }

    #[test]
    fn fade_ends_hidden() {
        let signal = ReadinessSignal::new();
        signal.set_ready();
        let mut loader = gate(&signal);

        loader.tick(ms(2000));
        loader.tick(ms(400));
        assert!((loader.opacity() - 0.5).abs() < 1e-4);
        assert_eq!(loader.tick(ms(400)), LoaderPhase::Hidden);
        assert_eq!(loader.opacity(), 0.0);
    }

    #[test]
    fn dropping_an_unready_loader_unsubscribes() {
        let signal = ReadinessSignal::new();
        let loader = gate(&signal);
        assert_eq!(signal.pending_count(), 1);
        drop(loader);
        assert_eq!(signal.pending_count(), 0);
    }
}
