//! Arena data model and state transitions

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Play-field size and border margin. Part of the wire contract.
pub const ARENA_SIZE: i32 = 400;
pub const ARENA_MARGIN: i32 = 10;

/// Paddle span along its edge, and its thickness.
pub const PAD_WIDTH: i32 = 80;
pub const PAD_HEIGHT: i32 = 10;

/// Extra reach beyond the pad extent when testing a border hit.
pub const COLLISION_TOLERANCE: i32 = 10;

/// Base ball speed in units per tick, before connection scaling.
pub const BALL_SPEED: i32 = 10;

/// Paddle travel per move command.
pub const PAD_STEP: i32 = 15;

/// Gap between a serving pad's face and the held ball.
pub const SERVE_GAP: i32 = 5;

/// Clamp range for pad positions along the axis of motion.
pub const PAD_MIN: i32 = 8;
pub const PAD_MAX: i32 = ARENA_SIZE - PAD_WIDTH + 10;

/// Clamp range for a ball co-moving with the pad that holds it.
pub const HELD_BALL_MIN: i32 = PAD_WIDTH / 2 + SERVE_GAP;
pub const HELD_BALL_MAX: i32 = ARENA_SIZE - PAD_WIDTH / 2 + SERVE_GAP;

/// Speed scaling rule: base magnitude divided by the live connection count,
/// truncating, floored at 1 so a crowded arena never stops the ball outright.
pub fn scaled_speed(base: i32, connections: usize) -> i32 {
    (base / connections.max(1) as i32).max(1)
}

/// One of the four fixed paddle slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadId {
    /// Right edge, moves vertically.
    Pad1,
    /// Left edge, moves vertically.
    Pad2,
    /// Top edge, moves horizontally.
    Pad3,
    /// Bottom edge, moves horizontally.
    Pad4,
}

impl PadId {
    /// Slot-assignment priority order.
    pub const ALL: [PadId; 4] = [PadId::Pad1, PadId::Pad2, PadId::Pad3, PadId::Pad4];

    pub fn index(self) -> usize {
        match self {
            PadId::Pad1 => 0,
            PadId::Pad2 => 1,
            PadId::Pad3 => 2,
            PadId::Pad4 => 3,
        }
    }

    /// Wire name, also the key in score and snapshot JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            PadId::Pad1 => "pad1",
            PadId::Pad2 => "pad2",
            PadId::Pad3 => "pad3",
            PadId::Pad4 => "pad4",
        }
    }

    /// Edge name used in slot-assignment notices.
    pub fn edge_label(self) -> &'static str {
        match self {
            PadId::Pad1 => "Right pad",
            PadId::Pad2 => "Left pad",
            PadId::Pad3 => "Top pad",
            PadId::Pad4 => "Bottom pad",
        }
    }

    /// Pad1/Pad2 slide along the top axis, Pad3/Pad4 along the left axis.
    pub fn moves_vertically(self) -> bool {
        matches!(self, PadId::Pad1 | PadId::Pad2)
    }

    pub fn default_position(self) -> (i32, i32) {
        match self {
            PadId::Pad1 => (399, 158),
            PadId::Pad2 => (9, 158),
            PadId::Pad3 => (158, 9),
            PadId::Pad4 => (158, 400),
        }
    }
}

/// A paddle. Position is the top-left corner in arena-local units.
#[derive(Debug, Clone, Copy)]
pub struct Pad {
    pub left: i32,
    pub top: i32,
    pub active: bool,
    pub holds_ball: bool,
}

/// The ball. Velocity is in units per tick.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub left: i32,
    pub top: i32,
    pub vel_left: i32,
    pub vel_top: i32,
}

/// Per-pad point counters. Serializes as `{"pad1":n,...,"pad4":n}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable([u32; 4]);

impl ScoreTable {
    pub fn get(&self, id: PadId) -> u32 {
        self.0[id.index()]
    }

    pub fn credit(&mut self, id: PadId) {
        self.0[id.index()] += 1;
    }

    pub fn reset(&mut self) {
        self.0 = [0; 4];
    }
}

impl Serialize for ScoreTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for id in PadId::ALL {
            map.serialize_entry(id.as_str(), &self.get(id))?;
        }
        map.end()
    }
}

/// The authoritative arena: four pads, the ball, scores, serve ownership.
/// All mutation happens under the single game lock.
#[derive(Debug, Clone)]
pub struct Arena {
    pub pads: [Pad; 4],
    pub ball: Ball,
    pub scores: ScoreTable,
    /// Most recent paddle to redirect the ball; receives score credit.
    pub last_touch: PadId,
    /// Live command-channel connections, spectators included. Scales speeds.
    pub connections: usize,
}

impl Arena {
    pub fn new() -> Self {
        let mut pads = [Pad {
            left: 0,
            top: 0,
            active: false,
            holds_ball: false,
        }; 4];
        for id in PadId::ALL {
            let (left, top) = id.default_position();
            pads[id.index()].left = left;
            pads[id.index()].top = top;
        }
        pads[PadId::Pad1.index()].holds_ball = true;

        let (p1_left, p1_top) = PadId::Pad1.default_position();
        let ball = Ball {
            left: p1_left - PAD_HEIGHT,
            top: p1_top + PAD_WIDTH / 2 - SERVE_GAP,
            vel_left: 0,
            vel_top: 0,
        };

        Self {
            pads,
            ball,
            scores: ScoreTable::default(),
            last_touch: PadId::Pad1,
            connections: 0,
        }
    }

    pub fn pad(&self, id: PadId) -> &Pad {
        &self.pads[id.index()]
    }

    pub fn pad_mut(&mut self, id: PadId) -> &mut Pad {
        &mut self.pads[id.index()]
    }

    /// The pad currently serving, if the ball is not in free flight.
    pub fn holder(&self) -> Option<PadId> {
        PadId::ALL.into_iter().find(|id| self.pad(*id).holds_ball)
    }

    pub fn activate(&mut self, id: PadId) {
        self.pad_mut(id).active = true;
    }

    /// Deactivate a pad and put it back at its default position.
    pub fn deactivate(&mut self, id: PadId) {
        let (left, top) = id.default_position();
        let pad = self.pad_mut(id);
        pad.active = false;
        pad.left = left;
        pad.top = top;
    }

    /// Shift a pad by `delta` along its axis of motion; a held ball co-moves
    /// with its own clamp so it stays on the serving line.
    pub fn move_pad(&mut self, id: PadId, delta: i32) {
        let holds = self.pad(id).holds_ball;
        if id.moves_vertically() {
            let pad = self.pad_mut(id);
            pad.top = (pad.top + delta).clamp(PAD_MIN, PAD_MAX);
            if holds {
                self.ball.top = (self.ball.top + delta).clamp(HELD_BALL_MIN, HELD_BALL_MAX);
            }
        } else {
            let pad = self.pad_mut(id);
            pad.left = (pad.left + delta).clamp(PAD_MIN, PAD_MAX);
            if holds {
                self.ball.left = (self.ball.left + delta).clamp(HELD_BALL_MIN, HELD_BALL_MAX);
            }
        }
    }

    /// Put the ball into free flight away from the serving pad.
    ///
    /// A `disconnect` launch nudges both velocity components so the ball
    /// cannot end up shuttling forever between two unattended walls, and
    /// forces any component that nudged to zero back to 1.
    pub fn launch(&mut self, id: PadId, disconnect: bool) {
        self.pad_mut(id).holds_ball = false;

        let magnitude = scaled_speed(BALL_SPEED, self.connections);
        let (vel_left, vel_top) = match id {
            PadId::Pad1 => (-magnitude, 0),
            PadId::Pad2 => (magnitude, 0),
            PadId::Pad3 => (0, magnitude),
            PadId::Pad4 => (0, -magnitude),
        };
        self.ball.vel_left = vel_left;
        self.ball.vel_top = vel_top;

        if disconnect {
            self.ball.vel_left += 1;
            self.ball.vel_top += 1;
            if self.ball.vel_left == 0 {
                self.ball.vel_left = 1;
            }
            if self.ball.vel_top == 0 {
                self.ball.vel_top = 1;
            }
        }
    }

    /// A pad failed to return the ball: credit `last_touch`, then hand the
    /// serve to the pad that missed.
    pub fn score(&mut self, missed: PadId) -> super::ScoreEvent {
        let awarded_to = self.last_touch;
        self.scores.credit(awarded_to);

        for pad in &mut self.pads {
            pad.holds_ball = false;
        }
        self.pad_mut(missed).holds_ball = true;
        self.ball.vel_left = 0;
        self.ball.vel_top = 0;

        // Serve position: half a pad width minus the gap along the pad's
        // face, pad thickness on the perpendicular. Pad1 faces left, pad4
        // faces up, so their offsets flip.
        let mut shift_top = if missed.moves_vertically() {
            PAD_WIDTH / 2 - SERVE_GAP
        } else {
            PAD_HEIGHT
        };
        let mut shift_left = if missed.moves_vertically() {
            PAD_HEIGHT
        } else {
            PAD_WIDTH / 2 - SERVE_GAP
        };
        if missed == PadId::Pad1 {
            shift_left = -shift_left;
        }
        if missed == PadId::Pad4 {
            shift_top = -shift_top - 1;
        }

        let pad = *self.pad(missed);
        self.ball.left = pad.left + shift_left;
        self.ball.top = pad.top + shift_top;

        self.last_touch = missed;
        super::ScoreEvent { missed, awarded_to }
    }

    /// Zero every score. Positions, velocity and serve ownership stay put.
    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_matches_defaults() {
        let arena = Arena::new();
        assert_eq!(arena.pad(PadId::Pad1).left, 399);
        assert_eq!(arena.pad(PadId::Pad1).top, 158);
        assert_eq!(arena.pad(PadId::Pad2).left, 9);
        assert_eq!(arena.pad(PadId::Pad3).top, 9);
        assert_eq!(arena.pad(PadId::Pad4).top, 400);
        assert!(PadId::ALL.iter().all(|id| !arena.pad(*id).active));

        // Ball starts attached to pad1, just inside its face.
        assert_eq!(arena.holder(), Some(PadId::Pad1));
        assert_eq!((arena.ball.left, arena.ball.top), (389, 193));
        assert_eq!((arena.ball.vel_left, arena.ball.vel_top), (0, 0));
        assert_eq!(arena.last_touch, PadId::Pad1);
        assert!(PadId::ALL.iter().all(|id| arena.scores.get(*id) == 0));
    }

    #[test]
    fn pad_moves_stay_clamped() {
        let mut arena = Arena::new();
        arena.pad_mut(PadId::Pad1).holds_ball = false;
        for _ in 0..50 {
            arena.move_pad(PadId::Pad1, -PAD_STEP);
        }
        assert_eq!(arena.pad(PadId::Pad1).top, PAD_MIN);
        for _ in 0..50 {
            arena.move_pad(PadId::Pad1, PAD_STEP);
        }
        assert_eq!(arena.pad(PadId::Pad1).top, PAD_MAX);

        for _ in 0..50 {
            arena.move_pad(PadId::Pad3, -PAD_STEP);
        }
        assert_eq!(arena.pad(PadId::Pad3).left, PAD_MIN);
        for _ in 0..50 {
            arena.move_pad(PadId::Pad3, PAD_STEP);
        }
        assert_eq!(arena.pad(PadId::Pad3).left, PAD_MAX);
    }

    #[test]
    fn held_ball_co_moves_with_its_own_clamp() {
        let mut arena = Arena::new();
        let before = arena.ball.top;
        arena.move_pad(PadId::Pad1, -PAD_STEP);
        assert_eq!(arena.ball.top, before - PAD_STEP);

        for _ in 0..50 {
            arena.move_pad(PadId::Pad1, -PAD_STEP);
        }
        assert_eq!(arena.pad(PadId::Pad1).top, PAD_MIN);
        assert_eq!(arena.ball.top, HELD_BALL_MIN);

        for _ in 0..50 {
            arena.move_pad(PadId::Pad1, PAD_STEP);
        }
        assert_eq!(arena.ball.top, HELD_BALL_MAX);
    }

    #[test]
    fn free_ball_ignores_pad_moves() {
        let mut arena = Arena::new();
        arena.connections = 1;
        arena.launch(PadId::Pad1, false);
        let ball_top = arena.ball.top;
        arena.move_pad(PadId::Pad1, -PAD_STEP);
        assert_eq!(arena.ball.top, ball_top);
    }

    #[test]
    fn launch_direction_points_away_from_each_pad() {
        for (id, expected) in [
            (PadId::Pad1, (-10, 0)),
            (PadId::Pad2, (10, 0)),
            (PadId::Pad3, (0, 10)),
            (PadId::Pad4, (0, -10)),
        ] {
            let mut arena = Arena::new();
            arena.connections = 1;
            arena.pad_mut(PadId::Pad1).holds_ball = false;
            arena.pad_mut(id).holds_ball = true;
            arena.launch(id, false);
            assert_eq!((arena.ball.vel_left, arena.ball.vel_top), expected);
            assert_eq!(arena.holder(), None);
        }
    }

    #[test]
    fn launch_speed_scales_with_connections() {
        let mut arena = Arena::new();
        arena.connections = 2;
        arena.launch(PadId::Pad1, false);
        assert_eq!(arena.ball.vel_left, -5);

        let mut arena = Arena::new();
        arena.connections = 20;
        arena.launch(PadId::Pad1, false);
        // 10 / 20 truncates to 0; the floor keeps the ball moving.
        assert_eq!(arena.ball.vel_left, -1);
    }

    #[test]
    fn disconnect_launch_never_leaves_a_zero_axis() {
        for connections in [1, 2, 4, 6, 10, 25] {
            for id in PadId::ALL {
                let mut arena = Arena::new();
                arena.connections = connections;
                arena.pad_mut(PadId::Pad1).holds_ball = false;
                arena.pad_mut(id).holds_ball = true;
                arena.launch(id, true);
                assert_ne!(arena.ball.vel_left, 0, "{id:?} n={connections}");
                assert_ne!(arena.ball.vel_top, 0, "{id:?} n={connections}");
            }
        }
    }

    #[test]
    fn score_credits_last_touch_and_hands_serve_to_the_miss() {
        let mut arena = Arena::new();
        arena.pad_mut(PadId::Pad1).holds_ball = false;
        arena.last_touch = PadId::Pad2;

        let event = arena.score(PadId::Pad1);
        assert_eq!(event.missed, PadId::Pad1);
        assert_eq!(event.awarded_to, PadId::Pad2);
        assert_eq!(arena.scores.get(PadId::Pad2), 1);
        assert_eq!(arena.holder(), Some(PadId::Pad1));
        assert_eq!((arena.ball.vel_left, arena.ball.vel_top), (0, 0));
        assert_eq!(arena.last_touch, PadId::Pad1);

        // Pad1 faces left, so the facing offset flips.
        let pad = *arena.pad(PadId::Pad1);
        assert_eq!(arena.ball.left, pad.left - PAD_HEIGHT);
        assert_eq!(arena.ball.top, pad.top + PAD_WIDTH / 2 - SERVE_GAP);
    }

    #[test]
    fn serve_positions_track_pad_orientation() {
        let mut arena = Arena::new();
        arena.pad_mut(PadId::Pad1).holds_ball = false;
        arena.score(PadId::Pad3);
        let pad = *arena.pad(PadId::Pad3);
        assert_eq!(arena.ball.left, pad.left + PAD_WIDTH / 2 - SERVE_GAP);
        assert_eq!(arena.ball.top, pad.top + PAD_HEIGHT);

        arena.score(PadId::Pad4);
        let pad = *arena.pad(PadId::Pad4);
        assert_eq!(arena.ball.left, pad.left + PAD_WIDTH / 2 - SERVE_GAP);
        assert_eq!(arena.ball.top, pad.top - (PAD_WIDTH / 2 - SERVE_GAP) - 1);
    }

    #[test]
    fn exactly_one_holder_after_score() {
        let mut arena = Arena::new();
        arena.score(PadId::Pad2);
        let holders = PadId::ALL
            .iter()
            .filter(|id| arena.pad(**id).holds_ball)
            .count();
        assert_eq!(holders, 1);
        assert_eq!(arena.holder(), Some(PadId::Pad2));
    }

    #[test]
    fn reset_scores_touches_nothing_else() {
        let mut arena = Arena::new();
        arena.connections = 1;
        arena.scores.credit(PadId::Pad1);
        arena.scores.credit(PadId::Pad3);
        arena.launch(PadId::Pad1, false);
        let ball = arena.ball;
        let pads = arena.pads;

        arena.reset_scores();
        assert!(PadId::ALL.iter().all(|id| arena.scores.get(*id) == 0));
        assert_eq!(arena.ball.left, ball.left);
        assert_eq!(arena.ball.vel_left, ball.vel_left);
        assert_eq!(arena.pads[0].top, pads[0].top);
    }

    #[test]
    fn score_table_serializes_with_pad_keys() {
        let mut scores = ScoreTable::default();
        scores.credit(PadId::Pad2);
        let value = serde_json::to_value(&scores).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"pad1": 0, "pad2": 1, "pad3": 0, "pad4": 0})
        );
    }

    #[test]
    fn scaled_speed_truncates_and_floors() {
        assert_eq!(scaled_speed(10, 1), 10);
        assert_eq!(scaled_speed(10, 3), 3);
        assert_eq!(scaled_speed(4, 3), 1);
        assert_eq!(scaled_speed(4, 5), 1);
        assert_eq!(scaled_speed(8, 0), 8);
    }
}
