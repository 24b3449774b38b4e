//! Ball physics: per-tick advance, border collisions, rebound speeds

use super::arena::{
    scaled_speed, Arena, ARENA_MARGIN, ARENA_SIZE, COLLISION_TOLERANCE, PAD_WIDTH,
};
use super::{PadId, ScoreEvent};

/// Physics pass over the arena, run once per broadcast tick.
pub struct Physics;

impl Physics {
    /// Advance the ball one step and resolve border contact.
    ///
    /// The four border checks are not mutually exclusive and run in a fixed
    /// order (left, right, top, bottom); a reflection from an earlier border
    /// is visible to the later checks within the same tick. A scoring miss
    /// ends the pass and returns the event.
    pub fn tick(arena: &mut Arena) -> Option<ScoreEvent> {
        arena.ball.left += arena.ball.vel_left;
        arena.ball.top += arena.ball.vel_top;

        if arena.ball.left <= ARENA_MARGIN {
            if let Some(event) = Self::border(arena, PadId::Pad2) {
                return Some(event);
            }
        }
        if arena.ball.left >= ARENA_SIZE - ARENA_MARGIN {
            if let Some(event) = Self::border(arena, PadId::Pad1) {
                return Some(event);
            }
        }
        if arena.ball.top <= ARENA_MARGIN {
            if let Some(event) = Self::border(arena, PadId::Pad3) {
                return Some(event);
            }
        }
        if arena.ball.top >= ARENA_SIZE - ARENA_MARGIN {
            if let Some(event) = Self::border(arena, PadId::Pad4) {
                return Some(event);
            }
        }
        None
    }

    /// The ball reached the border faced by `id`. An inactive pad's wall
    /// reflects unconditionally; an active pad either returns the ball or
    /// concedes the point.
    fn border(arena: &mut Arena, id: PadId) -> Option<ScoreEvent> {
        if !arena.pad(id).active {
            Self::reflect(arena, id);
            return None;
        }
        if Self::within_span(arena, id) {
            Self::reflect(arena, id);
            arena.last_touch = id;
            Self::rebound(arena, id);
            None
        } else {
            Some(arena.score(id))
        }
    }

    /// Flip the velocity component normal to this pad's edge.
    fn reflect(arena: &mut Arena, id: PadId) {
        if id.moves_vertically() {
            arena.ball.vel_left = -arena.ball.vel_left;
        } else {
            arena.ball.vel_top = -arena.ball.vel_top;
        }
    }

    /// Whether the ball's off-axis coordinate falls on the pad, with the
    /// fixed tolerance past its far end.
    fn within_span(arena: &Arena, id: PadId) -> bool {
        let pad = arena.pad(id);
        let (start, coord) = if id.moves_vertically() {
            (pad.top, arena.ball.top)
        } else {
            (pad.left, arena.ball.left)
        };
        (start..=start + PAD_WIDTH + COLLISION_TOLERANCE).contains(&coord)
    }

    /// Recompute the off-axis velocity from where the ball struck the pad.
    ///
    /// `diff` bands are strict on both sides; `diff == PAD_WIDTH / 5` matches
    /// none of them and keeps the current magnitude, which may be zero. The
    /// thirds boundary is compared as `3 * diff` against `PAD_WIDTH` so it
    /// keeps its fractional position.
    fn rebound(arena: &mut Arena, id: PadId) {
        let pad = *arena.pad(id);
        let (center, coord, current) = if id.moves_vertically() {
            (pad.top + PAD_WIDTH / 2, arena.ball.top, arena.ball.vel_top)
        } else {
            (
                pad.left + PAD_WIDTH / 2,
                arena.ball.left,
                arena.ball.vel_left,
            )
        };
        let diff = (center - coord).abs();

        let magnitude = if 5 * diff < PAD_WIDTH {
            scaled_speed(4, arena.connections)
        } else if 5 * diff > PAD_WIDTH && 3 * diff < PAD_WIDTH {
            scaled_speed(8, arena.connections)
        } else if 3 * diff > PAD_WIDTH {
            scaled_speed(10, arena.connections)
        } else {
            current.abs()
        };

        // Toward the near edge: negative when the ball sits at or above
        // (at or left of) the pad center.
        let signed = if coord <= center { -magnitude } else { magnitude };
        if id.moves_vertically() {
            arena.ball.vel_top = signed;
        } else {
            arena.ball.vel_left = signed;
        }
    }
}
