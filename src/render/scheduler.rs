/// Single-slot pending redraw queue.
///
/// Decouples "request a redraw" from "perform the redraw": requests never
/// draw, they park the percentage here, and the host's frame tick drains the
/// slot so at most one draw happens per tick. Requests landing between ticks
/// coalesce to the latest value, matching animation-frame semantics
/// (last-scheduled-wins, in frame order).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameScheduler {
    pending: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a redraw request with the percentage captured at request time.
    pub fn request(&mut self, percentage: f64) {
        self.pending = Some(percentage);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drain the slot; called once per host frame tick.
    pub fn take(&mut self) -> Option<f64> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let mut s = FrameScheduler::new();
        assert!(!s.is_pending());
        assert_eq!(s.take(), None);
    }

    #[test]
    fn same_frame_requests_coalesce_to_latest() {
        let mut s = FrameScheduler::new();
        s.request(10.0);
        s.request(35.0);
        s.request(90.0);
        assert_eq!(s.take(), Some(90.0));
        assert_eq!(s.take(), None);
    }

    #[test]
    fn later_request_supersedes_a_drained_one() {
        let mut s = FrameScheduler::new();
        s.request(25.0);
        assert_eq!(s.take(), Some(25.0));
        s.request(75.0);
        assert!(s.is_pending());
        assert_eq!(s.take(), Some(75.0));
    }
}
