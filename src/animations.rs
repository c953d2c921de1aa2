//! Loading spinner.
//!
//! While the monitor waits for its first reading the headline cycles through
//! `| / - \`. The spinner keeps its own timer: the loop ticks every
//! [`LOADING_PHASE_SLEEP`](crate::config::LOADING_PHASE_SLEEP) but a new frame
//! is only produced once [`LOADING_INTERVAL`] has elapsed since the last one,
//! so the animation speed does not depend on the tick rate.
//!
//! ```text
//! tick:   0   10  20  30  40  50  60 ... 100 ms
//! frame:                      |            /
//! ```

use embassy_time::Instant;

use crate::config::LOADING_INTERVAL;

/// Spinner glyphs, in display order.
pub const SPINNER_CHARS: [char; 4] = ['|', '/', '-', '\\'];

/// Frame gate for the loading spinner.
#[derive(Clone, Copy, Debug)]
pub struct Spinner {
    frame: usize,
    last_frame: Instant,
}

impl Spinner {
    /// Start the spinner timer at `now`. The first frame is due one interval later.
    pub const fn new(now: Instant) -> Self {
        Self {
            frame: 0,
            last_frame: now,
        }
    }

    /// Number of frames produced so far.
    #[inline]
    pub const fn frames(&self) -> usize { self.frame }

    /// Glyph to show if a frame is due at `now`, advancing the animation.
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> Option<char> {
        let since = now.checked_duration_since(self.last_frame)?;
        if since < LOADING_INTERVAL {
            return None;
        }

        let glyph = SPINNER_CHARS[self.frame % SPINNER_CHARS.len()];
        self.frame += 1;
        self.last_frame = now;
        Some(glyph)
    }
}
