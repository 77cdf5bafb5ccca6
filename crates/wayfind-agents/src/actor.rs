use std::fmt;

use wayfind_core::{Cell, Vec2};

/// Speed used by [`Actor::new`], in world units per tick.
pub const DEFAULT_SPEED: f32 = 0.25;

/// A moving body in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub name: String,
    pub position: Vec2,
    /// Maximum distance covered in one tick.
    pub speed: f32,
    /// Set by behaviours that could not find a way to their goal.
    pub stuck: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            position,
            speed: DEFAULT_SPEED,
            stuck: false,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// A cardinal step, as issued by manual control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The neighbour of `c` in this direction.
    pub fn step(self, c: Cell) -> Cell {
        let (dx, dy) = self.delta();
        c.shift(dx, dy)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(s)
    }
}
