//! [`Seat`] newtype (mod-4 arithmetic) and [`Wind`].

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Seat index around the table, 0..=3. Forced to mod-4 arithmetic so it can
/// double as the difference between two seats ("relative seat").
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(u8);

pub const S0: Seat = Seat(0);
pub const S1: Seat = Seat(1);
pub const S2: Seat = Seat(2);
pub const S3: Seat = Seat(3);

impl Seat {
    pub const fn new(i: u8) -> Self { Seat(i & 3) }

    pub const fn index(self) -> usize { self.0 as usize }
    pub const fn to_u8(self) -> u8 { self.0 }

    pub const fn add(self, n: u8) -> Seat { Seat(self.0.wrapping_add(n) & 3) }
    pub const fn sub(self, other: Seat) -> Seat { Seat(self.0.wrapping_sub(other.0) & 3) }

    /// The seat taking the next turn.
    pub const fn succ(self) -> Seat { self.add(1) }
}

impl From<usize> for Seat {
    fn from(i: usize) -> Self { Seat::new(i as u8) }
}

impl Display for Seat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// All seats in turn order.
pub const ALL_SEATS: [Seat; 4] = [S0, S1, S2, S3];

/// The three seats after the given one, in turn order.
pub const fn seats_after(seat: Seat) -> [Seat; 3] {
    [seat.add(1), seat.add(2), seat.add(3)]
}

/// Round/seat wind.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize, strum::Display, strum::EnumIter)]
pub enum Wind {
    #[default]
    #[strum(serialize = "E")]
    #[serde(rename = "E")]
    East,
    #[strum(serialize = "S")]
    #[serde(rename = "S")]
    South,
    #[strum(serialize = "W")]
    #[serde(rename = "W")]
    West,
    #[strum(serialize = "N")]
    #[serde(rename = "N")]
    North,
}

impl Wind {
    pub const fn next(self) -> Wind {
        match self {
            Wind::East => Wind::South,
            Wind::South => Wind::West,
            Wind::West => Wind::North,
            Wind::North => Wind::East,
        }
    }

    /// The wind's tile kind (ew/sw/ww/nw).
    pub const fn tile(self) -> super::Tile {
        match super::Tile::from_encoding(27 + self as u8) {
            Some(t) => t,
            None => unreachable!(),
        }
    }

    pub const fn from_index(i: u8) -> Wind {
        match i & 3 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            _ => Wind::North,
        }
    }

    /// Ordinal used to compare round progression (E1 < E4 < S1 < ...).
    pub const fn ordinal(self) -> u8 { self as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn seat_arithmetic_wraps() {
        check!(S3.succ() == S0);
        check!(S1.sub(S3) == S2);
        check!(seats_after(S2) == [S3, S0, S1]);
    }

    #[test]
    fn wind_tiles() {
        check!(Wind::East.tile().as_str() == "ew");
        check!(Wind::North.tile().as_str() == "nw");
        check!(Wind::North.next() == Wind::East);
    }
}
