//! D4 symmetry group operations for board canonicalization

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Cell};

/// D4 symmetry transformation (dihedral group of the square)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct D4Transform {
    /// Rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,
    /// Whether to apply reflection
    pub reflection: bool,
}

impl D4Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        D4Transform {
            rotation: 0,
            reflection: false,
        }
    }

    /// Get all 8 D4 transforms, identity first
    pub fn all() -> [D4Transform; 8] {
        let mut transforms = [D4Transform::identity(); 8];
        for (i, rotation) in [0, 90, 180, 270].into_iter().enumerate() {
            transforms[2 * i] = D4Transform {
                rotation,
                reflection: false,
            };
            transforms[2 * i + 1] = D4Transform {
                rotation,
                reflection: true,
            };
        }
        transforms
    }

    /// Apply transform to a row-major position on a `size x size` board
    pub fn transform_position(&self, pos: usize, size: usize) -> usize {
        let last = size - 1;
        let (mut row, mut col) = (pos / size, pos % size);

        // Reflect across the vertical axis before rotating.
        if self.reflection {
            col = last - col;
        }

        // Clockwise quarter turns
        for _ in 0..(self.rotation / 90) {
            (row, col) = (col, last - row);
        }

        row * size + col
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> D4Transform {
        if self.reflection {
            // Reflect-then-rotate compositions are involutions.
            *self
        } else {
            D4Transform {
                rotation: (360 - self.rotation) % 360,
                reflection: false,
            }
        }
    }
}

impl BoardState {
    /// Apply a D4 transform to the board
    pub fn transform(&self, t: &D4Transform) -> Self {
        let size = self.size();
        let mut transformed = self.clone();
        transformed.cells = vec![Cell::Empty; self.cells.len()];
        for (i, &cell) in self.cells.iter().enumerate() {
            transformed.cells[t.transform_position(i, size)] = cell;
        }
        transformed
    }

    /// All eight symmetric views of the board, identity first
    pub fn symmetric_views(&self) -> Vec<Self> {
        D4Transform::all().iter().map(|t| self.transform(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_noop() {
        let t = D4Transform::identity();
        for pos in 0..16 {
            assert_eq!(t.transform_position(pos, 4), pos);
        }
    }

    #[test]
    fn test_rotation_moves_corners() {
        let quarter = D4Transform {
            rotation: 90,
            reflection: false,
        };
        assert_eq!(quarter.transform_position(0, 3), 2);
        assert_eq!(quarter.transform_position(2, 3), 8);
        assert_eq!(quarter.transform_position(4, 3), 4);
        assert_eq!(quarter.transform_position(0, 4), 3);
    }

    #[test]
    fn test_inverse_round_trip() {
        for size in [3, 4, 5] {
            for t in D4Transform::all() {
                let inv = t.inverse();
                for pos in 0..size * size {
                    assert_eq!(
                        inv.transform_position(t.transform_position(pos, size), size),
                        pos
                    );
                }
            }
        }
    }

    #[test]
    fn test_transforms_are_permutations() {
        for t in D4Transform::all() {
            let mut seen: Vec<usize> = (0..25).map(|p| t.transform_position(p, 5)).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..25).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_corner_views_coincide() {
        let a = BoardState::default().make_move(0).unwrap();
        let b = BoardState::default().make_move(8).unwrap();
        assert!(a.symmetric_views().contains(&b));
    }
}
