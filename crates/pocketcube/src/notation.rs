//! Move notation.
//!
//! Face moves are written `R U F L D B`, whole-cube rotations `x y z`. A
//! suffix of `'` inverts the move and `2` makes it a half turn. Moves may be
//! separated by whitespace but do not have to be.

use thiserror::Error;

use crate::{Axis, Face, Twist};

/// Error produced when parsing move notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Character that does not start a move
    #[error("unknown move {ch:?} at position {pos}")]
    UnknownMove {
        /// Offending character.
        ch: char,
        /// Byte offset in the input.
        pos: usize,
    },
}

/// Parses a sequence of moves.
pub fn parse_moves(s: &str) -> Result<Vec<Twist>, NotationError> {
    let mut ret = vec![];
    let mut chars = s.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }
        let mut turns = 1;
        if chars.next_if(|&(_, c)| c == '2').is_some() {
            turns = 2;
        }
        if chars.next_if(|&(_, c)| c == '\'').is_some() {
            turns = -turns;
        }
        let twist = match ch {
            'R' => Twist::face(Face::R, turns),
            'U' => Twist::face(Face::U, turns),
            'F' => Twist::face(Face::F, turns),
            'L' => Twist::face(Face::L, turns),
            'D' => Twist::face(Face::D, turns),
            'B' => Twist::face(Face::B, turns),
            'x' => Twist::whole_cube(Axis::X, turns),
            'y' => Twist::whole_cube(Axis::Y, turns),
            'z' => Twist::whole_cube(Axis::Z, turns),
            _ => return Err(NotationError::UnknownMove { ch, pos }),
        };
        ret.push(twist);
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::LayerMask;

    #[test]
    fn test_parse_moves() {
        assert_eq!(
            parse_moves("R U' F2 L'").unwrap(),
            [
                Twist::R,
                Twist::face(Face::U, -1),
                Twist::face(Face::F, 2),
                Twist::face(Face::L, -1),
            ],
        );
        assert_eq!(parse_moves("RU'").unwrap().len(), 2);
        assert!(parse_moves("").unwrap().is_empty());
    }

    #[test]
    fn test_layer_angles() {
        // L' is the left layer turned +1, the same direction as R.
        let l_prime = parse_moves("L'").unwrap()[0];
        assert_eq!(l_prime.layers, LayerMask::NEGATIVE);
        assert_eq!(l_prime.angle, 1);
        let y2 = parse_moves("y2'").unwrap()[0];
        assert_eq!(y2, Twist::whole_cube(Axis::Y, -2));
    }

    #[test]
    fn test_round_trip_display() {
        let s = "R U' F2 L D' B2 x y' z2";
        let twists = parse_moves(s).unwrap();
        let printed = twists.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        assert_eq!(printed.join(" "), s);
    }

    #[test]
    fn test_unknown_move() {
        assert_eq!(
            parse_moves("R Q"),
            Err(NotationError::UnknownMove { ch: 'Q', pos: 2 }),
        );
        assert_eq!(
            parse_moves("2"),
            Err(NotationError::UnknownMove { ch: '2', pos: 0 }),
        );
    }
}
