//! Breathing-light arbitration — fixed-priority selection over active sources.
//!
//! Four logical sources can request the shared LED concurrently; the engine
//! tracks which of them currently want it lit, picks one winner by fixed
//! priority, and translates that into writes against the shared selector,
//! grade, and blink-mode registers. Internal bookkeeping reflects *requested*
//! state, not confirmed hardware state: a failed write never desynchronizes
//! the active set.

use std::fmt;

use crate::paths;
use crate::sink::{LightSink, Result, SinkError};

// ── Sources ──

/// Logical producers competing for the breathing LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreathSource {
    Notification,
    Battery,
    Buttons,
    Attention,
}

impl BreathSource {
    /// All sources, in descending priority. The ordering reflects perceived
    /// urgency to the user and is not configurable.
    pub const PRIORITY: [BreathSource; 4] = [
        BreathSource::Notification,
        BreathSource::Battery,
        BreathSource::Buttons,
        BreathSource::Attention,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BreathSource::Notification => "notifications",
            BreathSource::Battery => "battery",
            BreathSource::Buttons => "buttons",
            BreathSource::Attention => "attention",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BreathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Requested state ──

/// Requested state for one source: a packed 24-bit RGB color. The upper byte
/// is ignored. Always overwritten whole, never merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightState {
    pub color: u32,
}

impl LightState {
    pub const OFF: LightState = LightState { color: 0 };

    pub fn new(color: u32) -> Self {
        LightState { color }
    }

    /// Effective brightness: the red channel. A source with zero red is
    /// treated as inactive even if green/blue are set, since the breathing
    /// LED is a single red element.
    pub fn brightness(self) -> u8 {
        ((self.color >> 16) & 0xFF) as u8
    }

    /// Color with the unused upper byte masked off.
    pub fn rgb(self) -> u32 {
        self.color & 0x00FF_FFFF
    }
}

// ── Active set ──

/// Bitmask over the four sources. A bit is set iff the source's last update
/// carried nonzero brightness; maintained incrementally, never rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSources(u8);

impl ActiveSources {
    pub const EMPTY: ActiveSources = ActiveSources(0);

    pub fn insert(&mut self, source: BreathSource) {
        self.0 |= source.bit();
    }

    pub fn remove(&mut self, source: BreathSource) {
        self.0 &= !source.bit();
    }

    pub fn contains(self, source: BreathSource) -> bool {
        self.0 & source.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Highest-priority active source, if any.
    pub fn winner(self) -> Option<BreathSource> {
        BreathSource::PRIORITY.iter().copied().find(|s| self.contains(*s))
    }

    /// Active sources in priority order.
    pub fn iter(self) -> impl Iterator<Item = BreathSource> {
        BreathSource::PRIORITY
            .into_iter()
            .filter(move |s| self.contains(*s))
    }
}

// ── Engine ──

/// Owns the per-source state table, the active set, and the sink. One
/// instance per physical LED; callers serialize access externally (see
/// `hal::LightHal`).
pub struct BreathEngine<S> {
    sink: S,
    states: [LightState; 4],
    active: ActiveSources,
    last_applied: Option<BreathSource>,
}

impl<S: LightSink> BreathEngine<S> {
    pub fn new(sink: S) -> Self {
        BreathEngine {
            sink,
            states: [LightState::OFF; 4],
            active: ActiveSources::EMPTY,
            last_applied: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Last requested state for `source`.
    pub fn state(&self, source: BreathSource) -> LightState {
        self.states[source.index()]
    }

    pub fn active_sources(&self) -> ActiveSources {
        self.active
    }

    /// Source whose pattern currently drives the hardware, `None` after a
    /// full turn-off.
    pub fn last_applied(&self) -> Option<BreathSource> {
        self.last_applied
    }

    /// Replace `source`'s state and re-run arbitration.
    ///
    /// Every resulting hardware write is attempted even if an earlier one
    /// failed; the first error of the call is returned. Bookkeeping is
    /// updated regardless of write outcome.
    pub fn update(&mut self, source: BreathSource, state: LightState) -> Result<()> {
        self.states[source.index()] = state;

        let mut first_err = None;

        if state.brightness() > 0 {
            self.active.insert(source);
        } else {
            self.active.remove(source);

            // A deactivated source always clears both channels before any
            // re-resolution. The selector register is shared, so each off
            // write needs its own channel select.
            note(&mut first_err, self.sink.write_int(paths::BREATH_OUTN, paths::CHANNEL_BUTTONS));
            note(&mut first_err, self.sink.write_str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_OFF));
            note(&mut first_err, self.sink.write_int(paths::BREATH_OUTN, paths::CHANNEL_RED));
            note(&mut first_err, self.sink.write_str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_OFF));

            if self.active.is_empty() {
                self.last_applied = None;
                return finish(first_err);
            }
        }

        let Some(winner) = self.active.winner() else {
            // Unreachable given the emptiness check above; kept as a guard so
            // a bookkeeping bug cannot turn into stray writes.
            log::error!("no active source after arbitration, skipping writes");
            self.last_applied = None;
            return finish(first_err);
        };

        // The buttons pattern is static, so re-selecting it is a no-op worth
        // skipping. Breathing winners re-issue their writes on every
        // resolution that selects them.
        if winner == BreathSource::Buttons && self.last_applied == Some(BreathSource::Buttons) {
            return finish(first_err);
        }

        self.last_applied = Some(winner);

        if winner == BreathSource::Buttons {
            log::debug!("buttons win arbitration, steady on at both grades");
            note(&mut first_err, self.sink.write_int(paths::BREATH_OUTN, paths::CHANNEL_BUTTONS));
            note(&mut first_err, self.sink.write_int(paths::BREATH_GRADE, paths::GRADE_BUTTONS));
            note(&mut first_err, self.sink.write_str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_ON));
            note(&mut first_err, self.sink.write_int(paths::BREATH_OUTN, paths::CHANNEL_RED));
            note(&mut first_err, self.sink.write_int(paths::BREATH_GRADE, paths::GRADE_RED));
            note(&mut first_err, self.sink.write_str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_ON));
        } else {
            log::debug!("{winner} wins arbitration, breathing on the red channel");
            note(&mut first_err, self.sink.write_int(paths::BREATH_OUTN, paths::CHANNEL_RED));
            note(&mut first_err, self.sink.write_str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_BREATH));
        }

        finish(first_err)
    }
}

/// Track the first failed write of a resolution without aborting it.
fn note(first: &mut Option<SinkError>, result: Result<()>) {
    if let Err(e) = result
        && first.is_none()
    {
        *first = Some(e);
    }
}

fn finish(first: Option<SinkError>) -> Result<()> {
    first.map_or(Ok(()), Err)
}
