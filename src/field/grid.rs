//! Grid cell addressing.

/// Integer cell index on the field grid. `ix` runs along X, `iz` along Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub ix: u32,
    pub iz: u32,
}

impl CellCoord {
    pub fn new(ix: u32, iz: u32) -> Self {
        Self { ix, iz }
    }

    /// Row-major linear index (X outer, Z inner).
    #[inline]
    pub fn linear_index(self, dim: u32) -> usize {
        self.ix as usize * dim as usize + self.iz as usize
    }

    /// Every cell of a `dim` x `dim` grid in placement order: X outer, Z inner.
    pub fn iter(dim: u32) -> impl Iterator<Item = CellCoord> {
        (0..dim).flat_map(move |ix| (0..dim).map(move |iz| CellCoord::new(ix, iz)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_order_matches_linear_index() {
        let cells: Vec<_> = CellCoord::iter(3).collect();
        assert_eq!(cells.len(), 9);
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.linear_index(3), i);
        }
        assert_eq!(cells[1], CellCoord::new(0, 1));
        assert_eq!(cells[3], CellCoord::new(1, 0));
    }

    #[test]
    fn test_iter_empty_grid() {
        assert_eq!(CellCoord::iter(0).count(), 0);
    }
}
