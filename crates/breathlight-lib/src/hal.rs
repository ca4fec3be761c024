//! Device facades and lifecycle — name-keyed open, per-resource locking.
//!
//! [`LightHal`] is the single owned arbitration context: one mutex serializes
//! every breathing update end to end (state mutation, selection, and all
//! resulting writes), a second independent mutex serializes backlight writes.
//! Facades handed out by [`LightHal::open`] carry no state of their own.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::arbiter::{BreathEngine, BreathSource, LightState};
use crate::backlight;
use crate::error::{BreathlightError, Result};
use crate::sink::{LightSink, SysfsSink};

// ── Light identifiers ──

/// Logical light devices recognized at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    Backlight,
    Buttons,
    Battery,
    Notifications,
    Attention,
}

impl LightId {
    pub const ALL: [LightId; 5] = [
        LightId::Backlight,
        LightId::Buttons,
        LightId::Battery,
        LightId::Notifications,
        LightId::Attention,
    ];

    /// Host-framework name for this light.
    pub fn name(self) -> &'static str {
        match self {
            LightId::Backlight => "backlight",
            LightId::Buttons => "buttons",
            LightId::Battery => "battery",
            LightId::Notifications => "notifications",
            LightId::Attention => "attention",
        }
    }

    /// Breathing source this id feeds, `None` for the backlight.
    pub fn breath_source(self) -> Option<BreathSource> {
        match self {
            LightId::Backlight => None,
            LightId::Buttons => Some(BreathSource::Buttons),
            LightId::Battery => Some(BreathSource::Battery),
            LightId::Notifications => Some(BreathSource::Notification),
            LightId::Attention => Some(BreathSource::Attention),
        }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightId {
    type Err = BreathlightError;

    fn from_str(s: &str) -> Result<Self> {
        LightId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| BreathlightError::UnknownLight(s.into()))
    }
}

// ── Arbitration context ──

struct HalShared<S> {
    engine: Mutex<BreathEngine<S>>,
    backlight: Mutex<S>,
}

/// Shared context owning both physical light resources.
///
/// Constructed once and cloned into every facade (clones share the same
/// underlying state); there is no other mutable state in the crate. The
/// breathing engine and the backlight use separate sink instances so the two
/// paths never contend on a lock.
pub struct LightHal<S> {
    shared: Arc<HalShared<S>>,
}

impl<S> Clone for LightHal<S> {
    fn clone(&self) -> Self {
        LightHal {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl LightHal<SysfsSink> {
    /// Context over the live sysfs tree.
    pub fn new() -> Self {
        Self::with_sinks(SysfsSink::new(), SysfsSink::new())
    }

    /// Context over a scratch tree rooted at `root`.
    pub fn with_root(root: impl Into<std::path::PathBuf>) -> Self {
        let root = root.into();
        Self::with_sinks(SysfsSink::with_root(root.clone()), SysfsSink::with_root(root))
    }
}

impl Default for LightHal<SysfsSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LightSink> LightHal<S> {
    pub fn with_sinks(breath_sink: S, backlight_sink: S) -> Self {
        LightHal {
            shared: Arc::new(HalShared {
                engine: Mutex::new(BreathEngine::new(breath_sink)),
                backlight: Mutex::new(backlight_sink),
            }),
        }
    }

    /// Open a facade for `name`. Unknown names fail fast with
    /// [`BreathlightError::UnknownLight`]; no device is created.
    pub fn open(&self, name: &str) -> Result<LightHandle<S>> {
        let id = name.parse::<LightId>()?;
        log::debug!("opened light device {id}");
        Ok(LightHandle {
            id,
            hal: self.clone(),
        })
    }

    /// Apply one state update for `id` under the appropriate lock.
    pub fn set_light(&self, id: LightId, state: LightState) -> Result<()> {
        match id.breath_source() {
            Some(source) => {
                let mut engine = lock_unpoisoned(&self.shared.engine);
                engine.update(source, state)?;
            }
            None => {
                let sink = lock_unpoisoned(&self.shared.backlight);
                backlight::set_backlight(&*sink, state.color)?;
            }
        }
        Ok(())
    }

    /// Engine access for state inspection (tests, status tooling). Holds the
    /// breathing lock for the guard's lifetime.
    pub fn engine(&self) -> MutexGuard<'_, BreathEngine<S>> {
        lock_unpoisoned(&self.shared.engine)
    }
}

/// A panicked lock holder must not brick the device; re-enter and keep
/// serving. State stays consistent because updates mutate bookkeeping before
/// and after writes, never mid-write.
fn lock_unpoisoned<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|e| e.into_inner())
}

// ── Facade ──

/// Per-light facade handed to the host framework. Exposes the single
/// `set_state` capability; all logic lives behind the shared context.
pub struct LightHandle<S> {
    id: LightId,
    hal: LightHal<S>,
}

impl<S: LightSink> LightHandle<S> {
    pub fn id(&self) -> LightId {
        self.id
    }

    pub fn set_state(&self, state: LightState) -> Result<()> {
        self.hal.set_light(self.id, state)
    }

    /// Release the facade. Dropping has the same effect; provided for hosts
    /// that require an explicit close call.
    pub fn close(self) {}
}

// ── Process-wide context ──

/// The process-wide context, constructed exactly once on first use.
pub fn shared() -> &'static LightHal<SysfsSink> {
    static HAL: OnceLock<LightHal<SysfsSink>> = OnceLock::new();
    HAL.get_or_init(LightHal::new)
}

/// Open a facade on the process-wide context.
pub fn open_light(name: &str) -> Result<LightHandle<SysfsSink>> {
    shared().open(name)
}
