//! Freehand polygon capture.
//!
//! The session owns completion entirely; the host's drawing layer only
//! reports taps. In particular there is no auto-close when a tap merely
//! lands *near* the start after three vertices; the ring closes on an
//! explicit gesture only: a tap within [`CLOSE_DISTANCE_M`] of the first
//! vertex, a double-activation, or an external stop signal.

use log::debug;

use crate::geom::{LngLat, Ring};

/// A valid polygon ring needs at least this many distinct vertices.
pub const MIN_VERTICES: usize = 3;

/// Taps within this distance of the first vertex close the ring.
pub const CLOSE_DISTANCE_M: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Drawing,
}

/// Tracks one in-progress hand-drawn polygon.
///
/// Completion hands the closed ring back to the caller and returns the
/// session to `Idle`; cancellation leaves no trace.
pub struct DrawSession {
    state: DrawState,
    vertices: Vec<LngLat>,
}

impl Default for DrawSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSession {
    pub fn new() -> Self {
        Self { state: DrawState::Idle, vertices: Vec::new() }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == DrawState::Drawing
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Begin a fresh session, discarding any leftover vertices.
    pub fn start(&mut self) {
        self.vertices.clear();
        self.state = DrawState::Drawing;
    }

    /// Handle a pointer-down while drawing.
    ///
    /// Below [`MIN_VERTICES`] every tap appends. From three vertices on, a
    /// tap within [`CLOSE_DISTANCE_M`] of the first vertex is the closing
    /// gesture; anything farther appends. There is no vertex cap.
    pub fn pointer_down(&mut self, p: LngLat) -> Option<Ring> {
        if self.state != DrawState::Drawing {
            return None;
        }
        if self.vertices.len() >= MIN_VERTICES && p.distance_m(&self.vertices[0]) <= CLOSE_DISTANCE_M
        {
            return Some(self.finish());
        }
        self.vertices.push(p);
        None
    }

    /// Double-activation: an explicit finish wherever the pointer is, as
    /// long as enough vertices exist. The pair's taps add no vertex; below
    /// three vertices the gesture is ignored.
    pub fn double_click(&mut self) -> Option<Ring> {
        if self.state == DrawState::Drawing && self.vertices.len() >= MIN_VERTICES {
            Some(self.finish())
        } else {
            None
        }
    }

    /// External stop signal: completes the ring at three or more vertices,
    /// silently discards otherwise.
    pub fn stop(&mut self) -> Option<Ring> {
        if self.state != DrawState::Drawing {
            return None;
        }
        if self.vertices.len() >= MIN_VERTICES {
            Some(self.finish())
        } else {
            self.cancel();
            None
        }
    }

    /// Abandon the session without producing a polygon.
    pub fn cancel(&mut self) {
        if !self.vertices.is_empty() {
            debug!("draw session discarded with {} vertices", self.vertices.len());
        }
        self.vertices.clear();
        self.state = DrawState::Idle;
    }

    fn finish(&mut self) -> Ring {
        let mut ring = std::mem::take(&mut self.vertices);
        if let Some(&first) = ring.first() {
            if ring.last() != Some(&first) {
                ring.push(first);
            }
        }
        self.state = DrawState::Idle;
        debug!("draw session completed, ring of {} positions", ring.len());
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lng: f64, lat: f64) -> LngLat {
        LngLat::new(lng, lat)
    }

    #[test]
    fn taps_before_three_vertices_always_append() {
        let mut session = DrawSession::new();
        session.start();
        // Even a tap right back on the first vertex appends at this stage.
        assert!(session.pointer_down(p(0.0, 0.0)).is_none());
        assert!(session.pointer_down(p(0.0, 0.0)).is_none());
        assert!(session.pointer_down(p(1.0, 0.0)).is_none());
        assert_eq!(session.vertex_count(), 3);
    }

    #[test]
    fn tap_on_first_vertex_closes_after_three() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(1.0, 0.0));
        session.pointer_down(p(1.0, 1.0));
        let ring = session.pointer_down(p(0.0, 0.0)).expect("closing tap");
        assert_eq!(ring, vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)]);
        assert!(!session.is_drawing());
    }

    #[test]
    fn nearby_taps_do_not_auto_close() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(1.0, 0.0));
        session.pointer_down(p(1.0, 1.0));
        // ~11 m from the first vertex: close by screen standards, far by
        // the 0.5 m gate. Must append, not close.
        assert!(session.pointer_down(p(0.0001, 0.0)).is_none());
        assert_eq!(session.vertex_count(), 4);
        assert!(session.is_drawing());
    }

    #[test]
    fn unbounded_vertex_count() {
        let mut session = DrawSession::new();
        session.start();
        for i in 0..500 {
            assert!(session.pointer_down(p(1.0 + i as f64 * 0.01, 2.0)).is_none());
        }
        assert_eq!(session.vertex_count(), 500);
    }

    #[test]
    fn double_click_finishes_with_accumulated_vertices() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(10.0, 0.0));
        session.pointer_down(p(10.0, 10.0));
        session.pointer_down(p(0.0, 10.0));
        let ring = session.double_click().expect("double-click finish");
        assert_eq!(
            ring,
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(0.0, 0.0)]
        );
    }

    #[test]
    fn double_click_below_three_vertices_is_ignored() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(1.0, 0.0));
        assert!(session.double_click().is_none());
        assert!(session.is_drawing());
        assert_eq!(session.vertex_count(), 2);
    }

    #[test]
    fn forced_stop_completes_at_three_vertices() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(1.0, 0.0));
        session.pointer_down(p(1.0, 1.0));
        let ring = session.stop().expect("forced completion");
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn forced_stop_below_three_vertices_discards() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(1.0, 0.0));
        assert!(session.stop().is_none());
        assert!(!session.is_drawing());
        assert_eq!(session.vertex_count(), 0);
    }

    #[test]
    fn closing_vertex_is_appended_exactly_once() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.pointer_down(p(1.0, 0.0));
        session.pointer_down(p(1.0, 1.0));
        let ring = session.pointer_down(p(0.0, 0.0)).expect("closed");
        assert_eq!(ring.iter().filter(|v| **v == p(0.0, 0.0)).count(), 2);
    }

    #[test]
    fn restart_discards_leftover_vertices() {
        let mut session = DrawSession::new();
        session.start();
        session.pointer_down(p(0.0, 0.0));
        session.start();
        assert_eq!(session.vertex_count(), 0);
        assert!(session.is_drawing());
    }

    #[test]
    fn events_while_idle_are_no_ops() {
        let mut session = DrawSession::new();
        assert!(session.pointer_down(p(0.0, 0.0)).is_none());
        assert!(session.double_click().is_none());
        assert!(session.stop().is_none());
        assert_eq!(session.vertex_count(), 0);
    }
}
