//! Player movement, map clamping and station collision.

use serde::{Deserialize, Serialize};

use crate::items::Item;
use crate::math::{Fixed, Vec2Fixed};
use crate::stations::StationTable;

/// One of the four cardinal directions.
///
/// Used both for held movement keys and for the player's facing. Screen
/// coordinates grow downward, so `Down` is `+y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards `-y`.
    Up,
    /// Towards `+y`.
    Down,
    /// Towards `-x`.
    Left,
    /// Towards `+x`.
    Right,
}

/// Set of movement directions currently held by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldDirections {
    /// Up is held.
    pub up: bool,
    /// Down is held.
    pub down: bool,
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
}

impl HeldDirections {
    /// Nothing held.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Build from a list of held directions.
    #[must_use]
    pub fn from_directions(directions: impl IntoIterator<Item = Direction>) -> Self {
        let mut held = Self::NONE;
        for direction in directions {
            held.press(direction);
        }
        held
    }

    /// Mark a direction as held.
    pub fn press(&mut self, direction: Direction) {
        *self.slot(direction) = true;
    }

    /// Mark a direction as released.
    pub fn release(&mut self, direction: Direction) {
        *self.slot(direction) = false;
    }

    fn slot(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Collapse the held set into a movement intent.
    ///
    /// Opposite directions cancel out.
    #[must_use]
    pub fn intent(self) -> MoveIntent {
        let dx = i32::from(self.right) - i32::from(self.left);
        let dy = i32::from(self.down) - i32::from(self.up);
        MoveIntent::new(dx, dy)
    }
}

/// Raw axis signs plus the unit movement vector derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    dx: i32,
    dy: i32,
    vector: Vec2Fixed,
}

impl MoveIntent {
    /// No movement.
    pub const IDLE: Self = Self {
        dx: 0,
        dy: 0,
        vector: Vec2Fixed::ZERO,
    };

    /// Intent from axis signs in `-1..=1`. Diagonals are normalized.
    #[must_use]
    pub fn new(dx: i32, dy: i32) -> Self {
        let dx = dx.signum();
        let dy = dy.signum();
        Self {
            dx,
            dy,
            vector: Vec2Fixed::from_int(dx, dy).normalize(),
        }
    }

    /// Unit (or zero) direction vector.
    #[must_use]
    pub const fn vector(self) -> Vec2Fixed {
        self.vector
    }

    /// Check for zero intent.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Facing after applying this intent.
    ///
    /// Horizontal is applied first and vertical second, so vertical wins on
    /// diagonals. Zero intent keeps `current`.
    #[must_use]
    pub fn facing(self, current: Direction) -> Direction {
        let mut facing = current;
        if self.dx > 0 {
            facing = Direction::Right;
        } else if self.dx < 0 {
            facing = Direction::Left;
        }
        if self.dy > 0 {
            facing = Direction::Down;
        } else if self.dy < 0 {
            facing = Direction::Up;
        }
        facing
    }
}

/// Rectangle the player centre is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapBounds {
    /// Map width in world units.
    pub width: u32,
    /// Map height in world units.
    pub height: u32,
    /// Distance the player centre keeps from every edge.
    pub margin: u32,
}

impl MapBounds {
    /// Lowest allowed player position.
    #[must_use]
    pub fn min(&self) -> Vec2Fixed {
        let m = Fixed::from_num(self.margin);
        Vec2Fixed::new(m, m)
    }

    /// Highest allowed player position.
    #[must_use]
    pub fn max(&self) -> Vec2Fixed {
        let m = Fixed::from_num(self.margin);
        Vec2Fixed::new(
            Fixed::from_num(self.width) - m,
            Fixed::from_num(self.height) - m,
        )
    }

    /// Map centre.
    #[must_use]
    pub fn center(&self) -> Vec2Fixed {
        Vec2Fixed::new(
            Fixed::from_num(self.width) / Fixed::from_num(2),
            Fixed::from_num(self.height) / Fixed::from_num(2),
        )
    }

    /// Clamp a position into the playable area.
    #[must_use]
    pub fn clamp(&self, position: Vec2Fixed) -> Vec2Fixed {
        position.clamp(self.min(), self.max())
    }

    /// Check if a point lies on the map (ignoring the margin).
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let inside = |v: i32, size: u32| u32::try_from(v).is_ok_and(|v| v <= size);
        inside(x, self.width) && inside(y, self.height)
    }
}

/// The player character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerState {
    /// Centre position.
    pub position: Vec2Fixed,
    /// Displacement requested on the last tick.
    pub velocity: Vec2Fixed,
    /// Carried item.
    pub held_item: Option<Item>,
    /// Last non-idle facing.
    pub facing: Direction,
    /// Forklift mode.
    pub in_forklift: bool,
}

impl PlayerState {
    /// Fresh player: empty-handed, on foot, facing down.
    #[must_use]
    pub const fn spawn(position: Vec2Fixed) -> Self {
        Self {
            position,
            velocity: Vec2Fixed::ZERO,
            held_item: None,
            facing: Direction::Down,
            in_forklift: false,
        }
    }
}

/// Parameters of the movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementParams {
    /// Distance travelled per tick at full intent.
    pub speed: Fixed,
    /// Minimum distance between player and station centres.
    pub collision_radius: Fixed,
    /// Playable area.
    pub bounds: MapBounds,
}

/// Move the player one tick.
///
/// The step is clamped to the map, then pushed out of each overlapping
/// station in layout order. Each push only considers one station, so a
/// later push can move the player back into an earlier station. Stations
/// are spaced far enough apart in practice that this does not show.
pub fn movement_system(
    player: &mut PlayerState,
    intent: MoveIntent,
    params: &MovementParams,
    stations: &StationTable,
) {
    player.velocity = intent.vector().scale(params.speed);
    let mut position = params.bounds.clamp(player.position + player.velocity);

    let radius_sq = params.collision_radius * params.collision_radius;
    for station in stations.iter() {
        if position.distance_squared(station.position) >= radius_sq {
            continue;
        }
        let away = (position - station.position).normalize();
        let away = if away.is_zero() { Vec2Fixed::UNIT_X } else { away };
        position = station.position + away.scale(params.collision_radius);
    }

    player.position = position;
    player.facing = intent.facing(player.facing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::{StationConfig, StationId, StationType};

    fn params() -> MovementParams {
        MovementParams {
            speed: Fixed::from_num(6),
            collision_radius: Fixed::from_num(40),
            bounds: MapBounds {
                width: 800,
                height: 600,
                margin: 20,
            },
        }
    }

    fn table(positions: &[(i32, i32)]) -> StationTable {
        let stations = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| StationConfig {
                id: StationId(u16::try_from(i).unwrap()),
                key: format!("parking-{i}"),
                kind: StationType::ForkliftParking,
                position: Vec2Fixed::from_int(x, y),
                input: None,
                output: None,
                processing_time_ms: 0,
                color: String::new(),
                auto_next: None,
            })
            .collect();
        StationTable::from_validated(stations)
    }

    fn near(a: Fixed, b: Fixed) -> bool {
        (a - b).abs() < Fixed::from_num(0.001)
    }

    #[test]
    fn test_intent_from_held_keys() {
        let held = HeldDirections::from_directions([Direction::Right]);
        assert_eq!(held.intent().vector(), Vec2Fixed::UNIT_X);

        let cancel = HeldDirections::from_directions([Direction::Left, Direction::Right]);
        assert!(cancel.intent().is_idle());

        let diagonal = HeldDirections::from_directions([Direction::Down, Direction::Right]);
        let v = diagonal.intent().vector();
        assert!(near(v.dot(v), Fixed::ONE));
    }

    #[test]
    fn test_facing_vertical_wins() {
        assert_eq!(MoveIntent::new(1, 0).facing(Direction::Down), Direction::Right);
        assert_eq!(MoveIntent::new(-1, -1).facing(Direction::Down), Direction::Up);
        assert_eq!(MoveIntent::new(1, 1).facing(Direction::Left), Direction::Down);
        assert_eq!(MoveIntent::IDLE.facing(Direction::Left), Direction::Left);
    }

    #[test]
    fn test_step_moves_by_speed() {
        let mut player = PlayerState::spawn(Vec2Fixed::from_int(400, 300));
        movement_system(&mut player, MoveIntent::new(0, -1), &params(), &table(&[]));
        assert_eq!(player.position, Vec2Fixed::from_int(400, 294));
        assert_eq!(player.facing, Direction::Up);
    }

    #[test]
    fn test_clamped_to_margin() {
        let mut player = PlayerState::spawn(Vec2Fixed::from_int(22, 578));
        movement_system(&mut player, MoveIntent::new(-1, 1), &params(), &table(&[]));
        assert!(player.position.x >= Fixed::from_num(20));
        assert!(player.position.y <= Fixed::from_num(580));

        for _ in 0..10 {
            movement_system(&mut player, MoveIntent::new(-1, 1), &params(), &table(&[]));
        }
        assert_eq!(player.position, Vec2Fixed::from_int(20, 580));
    }

    #[test]
    fn test_pushed_out_to_collision_radius() {
        let stations = table(&[(400, 250)]);
        let mut player = PlayerState::spawn(Vec2Fixed::from_int(400, 296));
        movement_system(&mut player, MoveIntent::new(0, -1), &params(), &stations);

        assert!(near(player.position.x, Fixed::from_num(400)));
        assert!(near(player.position.y, Fixed::from_num(290)));
        assert!(near(
            player.position.distance(Vec2Fixed::from_int(400, 250)),
            Fixed::from_num(40)
        ));
    }

    #[test]
    fn test_coincident_centre_pushes_along_x() {
        let stations = table(&[(400, 300)]);
        let mut player = PlayerState::spawn(Vec2Fixed::from_int(400, 300));
        movement_system(&mut player, MoveIntent::IDLE, &params(), &stations);
        assert_eq!(player.position, Vec2Fixed::from_int(440, 300));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = params().bounds;
        assert!(bounds.contains(0, 0));
        assert!(bounds.contains(800, 600));
        assert!(!bounds.contains(-1, 10));
        assert!(!bounds.contains(10, 601));
        assert_eq!(bounds.center(), Vec2Fixed::from_int(400, 300));
    }
}
