//! Cosmetic effect states driven by a ball's frame counter
//!
//! Bounce-flash and explode are one-shot windows `[start, end]`; a ball is
//! in the effect while `frame <= end`. Glow is a two-phase oscillator that
//! rolls into a new window each time one completes. Blink is a hard toggle
//! on multiples of its period.

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, interpolate};

/// Fraction of the way through `[start, end]` at `frame`, clamped to [0, 1]
#[inline]
pub fn window_progress(frame: u64, start: u64, end: u64) -> f64 {
    if end <= start {
        return 1.0;
    }
    ((frame as f64 - start as f64) / (end - start) as f64).clamp(0.0, 1.0)
}

/// A one-shot effect window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EffectWindow {
    #[default]
    Inactive,
    Active { start: u64, end: u64 },
}

impl EffectWindow {
    /// Open a window at `frame` lasting `duration` frames
    pub fn open(frame: u64, duration: u32) -> Self {
        EffectWindow::Active {
            start: frame,
            end: frame + duration as u64,
        }
    }

    /// The end bound is inclusive
    #[inline]
    pub fn is_active(&self, frame: u64) -> bool {
        match *self {
            EffectWindow::Active { end, .. } => frame <= end,
            EffectWindow::Inactive => false,
        }
    }

    /// Progress through the window (1.0 once inactive)
    pub fn progress(&self, frame: u64) -> f64 {
        match *self {
            EffectWindow::Active { start, end } => window_progress(frame, start, end),
            EffectWindow::Inactive => 1.0,
        }
    }

    /// Color blended from `from` to `to` across the window (`to` once inactive)
    pub fn color_at(&self, frame: u64, from: Rgb, to: Rgb) -> Rgb {
        match *self {
            EffectWindow::Active { start, end } => interpolate(frame, from, to, start, end),
            EffectWindow::Inactive => to,
        }
    }
}

/// Direction of the glow oscillator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlowPhase {
    /// Base color toward glow color
    Rising,
    /// Glow color back toward base color
    Falling,
}

impl GlowPhase {
    pub fn flipped(self) -> Self {
        match self {
            GlowPhase::Rising => GlowPhase::Falling,
            GlowPhase::Falling => GlowPhase::Rising,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlowState {
    #[default]
    Off,
    On { start: u64, end: u64, phase: GlowPhase },
}

impl GlowState {
    /// Begin a rising half-cycle at `frame`
    pub fn rising(frame: u64, rate: u32) -> Self {
        GlowState::On {
            start: frame,
            end: frame + rate as u64,
            phase: GlowPhase::Rising,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, GlowState::On { .. })
    }

    /// Advance the oscillator to `frame`
    ///
    /// Flips the phase once the current half-cycle has reached its end and
    /// returns the phase with the progress one frame ahead, so the color
    /// starts moving on the very frame glowing begins.
    pub fn advance(&mut self, frame: u64, rate: u32) -> Option<(GlowPhase, f64)> {
        let GlowState::On { start, end, phase } = self else {
            return None;
        };
        if frame >= *end {
            *phase = phase.flipped();
            *start = frame;
            *end = frame + rate as u64;
        }
        Some((*phase, window_progress(frame + 1, *start, *end)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlinkState {
    #[default]
    Off,
    On { showing_alt: bool },
}

impl BlinkState {
    pub fn is_on(&self) -> bool {
        matches!(self, BlinkState::On { .. })
    }

    /// Toggle on multiples of `rate`; returns whether the blink color shows
    pub fn advance(&mut self, frame: u64, rate: u32) -> Option<bool> {
        let BlinkState::On { showing_alt } = self else {
            return None;
        };
        if rate > 0 && frame % rate as u64 == 0 {
            *showing_alt = !*showing_alt;
        }
        Some(*showing_alt)
    }
}
