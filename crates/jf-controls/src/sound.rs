//! Panel sound effects.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use jf_core::Join;
use jf_panel::SigEndpoint;

use crate::error::{ControlError, ControlResult};
use crate::timer::HoldTimer;

/// A sound effect that can be played or stopped at runtime.
///
/// Play and stop are pulses (high then low) on their respective joins. A
/// loop interval re-pulses the play join on a timer until stopped.
pub struct Sound {
    inner: Arc<SoundInner>,
}

struct SoundInner {
    panel: Arc<dyn SigEndpoint>,
    play_join: Mutex<Join>,
    stop_join: Mutex<Join>,
    loop_interval: Mutex<Duration>,
    loop_timer: HoldTimer,
}

impl Sound {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<SoundInner>| {
            let timer_weak = weak.clone();
            SoundInner {
                panel,
                play_join: Mutex::new(Join::UNBOUND),
                stop_join: Mutex::new(Join::UNBOUND),
                loop_interval: Mutex::new(Duration::ZERO),
                loop_timer: HoldTimer::stopped(move || {
                    if let Some(inner) = timer_weak.upgrade() {
                        inner.loop_tick();
                    }
                }),
            }
        });
        Self { inner }
    }

    pub fn play_join(&self) -> Join {
        *self.inner.play_join.lock().unwrap()
    }

    pub fn set_play_join(&self, join: Join) {
        *self.inner.play_join.lock().unwrap() = join;
    }

    pub fn stop_join(&self) -> Join {
        *self.inner.stop_join.lock().unwrap()
    }

    pub fn set_stop_join(&self, join: Join) {
        *self.inner.stop_join.lock().unwrap() = join;
    }

    /// Play the sound once.
    pub fn play(&self) -> ControlResult<()> {
        self.play_looping(Duration::ZERO)
    }

    /// Play the sound, re-triggering at `loop_interval` until stopped. A
    /// zero interval plays once.
    pub fn play_looping(&self, loop_interval: Duration) -> ControlResult<()> {
        let join = self.play_join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op: "play sound" });
        }
        self.inner.pulse(join);
        *self.inner.loop_interval.lock().unwrap() = loop_interval;
        if loop_interval.is_zero() {
            self.inner.loop_timer.stop();
        } else {
            self.inner.loop_timer.reset(loop_interval);
        }
        Ok(())
    }

    /// Stop the sound and any looping.
    pub fn stop(&self) -> ControlResult<()> {
        self.inner.loop_timer.stop();
        let join = self.stop_join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op: "stop sound" });
        }
        self.inner.pulse(join);
        Ok(())
    }
}

impl SoundInner {
    fn pulse(&self, join: Join) {
        self.panel.send_input_digital(join, true);
        self.panel.send_input_digital(join, false);
    }

    fn loop_tick(&self) {
        let join = *self.play_join.lock().unwrap();
        if join.is_unbound() {
            return;
        }
        self.pulse(join);
        let interval = *self.loop_interval.lock().unwrap();
        if !interval.is_zero() {
            self.loop_timer.reset(interval);
        }
    }
}
