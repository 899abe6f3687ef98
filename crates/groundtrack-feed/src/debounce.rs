//! Zone transition smoothing.
//!
//! The classifier is stateless by contract; suppressing single-sample
//! flapping near a zone boundary is a caller concern. [`ZoneDebouncer`]
//! is that thin stateful wrapper: it reports a transition only after the
//! same zone has been observed in N consecutive samples.

use groundtrack_core::Zone;

#[derive(Debug)]
pub struct ZoneDebouncer {
    required: u32,
    reported: Option<Zone>,
    candidate: Option<Zone>,
    streak: u32,
}

impl ZoneDebouncer {
    /// `required` consecutive identical zones confirm a transition
    /// (clamped to at least 1, where the debouncer is transparent).
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            reported: None,
            candidate: None,
            streak: 0,
        }
    }

    /// Feed one classified zone; returns the newly confirmed zone when
    /// the reported state changes, None otherwise.
    pub fn observe(&mut self, zone: &Zone) -> Option<Zone> {
        if self.reported.as_ref() == Some(zone) {
            // Back on the reported state; forget any half-confirmed change
            self.candidate = None;
            self.streak = 0;
            return None;
        }

        if self.candidate.as_ref() == Some(zone) {
            self.streak += 1;
        } else {
            self.candidate = Some(zone.clone());
            self.streak = 1;
        }

        if self.streak >= self.required {
            self.reported = self.candidate.take();
            self.streak = 0;
            return self.reported.clone();
        }
        None
    }

    /// The currently confirmed zone, if any sample has confirmed one yet.
    pub fn current(&self) -> Option<&Zone> {
        self.reported.as_ref()
    }
}
