//! Tile coordinate bases.
//!
//! Tiles are enumerated internally in image space: `(row, col)` with the
//! origin at the north-west corner and rows growing southward. Viewers
//! expect other conventions (TMS puts the origin south-west and lists the
//! column first), so every emitted coordinate goes through [`to_basis`].
//!
//! ```text
//!   image space (NW, row-major)        south-west, column-major
//!   ┌───────┬───────┐                  ┌───────┬───────┐
//!   │ (0,0) │ (0,1) │                  │ (0,1) │ (1,1) │
//!   ├───────┼───────┤        ──►       ├───────┼───────┤
//!   │ (1,0) │ (1,1) │                  │ (0,0) │ (1,0) │
//!   └───────┴───────┘                  └───────┴───────┘
//! ```

mod types;

pub use types::{
    AxisOrder, CoordError, Corner, GridShape, TileAddress, TilePosition, TileShape,
    DEFAULT_TILE_SIZE,
};

/// Converts an image-space tile index into the `(corner, order)` basis.
///
/// East-anchored corners reflect the column, south-anchored corners reflect
/// the row, and column-major order swaps the pair. `NorthWest` with
/// `RowMajor` is the identity.
///
/// `row < grid.rows` and `col < grid.cols` must hold.
#[inline]
pub fn to_basis(
    order: AxisOrder,
    corner: Corner,
    grid: GridShape,
    (row, col): (u32, u32),
) -> TilePosition {
    debug_assert!(row < grid.rows && col < grid.cols);
    let col = if corner.is_east() {
        grid.cols - col - 1
    } else {
        col
    };
    let row = if corner.is_south() {
        grid.rows - row - 1
    } else {
        row
    };
    match order {
        AxisOrder::ColumnMajor => TilePosition::new(col, row),
        AxisOrder::RowMajor => TilePosition::new(row, col),
    }
}

/// Inverse of [`to_basis`]: recovers the image-space `(row, col)`.
#[inline]
pub fn from_basis(
    order: AxisOrder,
    corner: Corner,
    grid: GridShape,
    position: TilePosition,
) -> (u32, u32) {
    let (row, col) = match order {
        AxisOrder::ColumnMajor => (position.minor, position.major),
        AxisOrder::RowMajor => (position.major, position.minor),
    };
    // Reflection is its own inverse.
    let row = if corner.is_south() {
        grid.rows - row - 1
    } else {
        row
    };
    let col = if corner.is_east() {
        grid.cols - col - 1
    } else {
        col
    };
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_north_west_row_major_is_identity() {
        let grid = GridShape::new(3, 5);
        for row in 0..3 {
            for col in 0..5 {
                let pos = to_basis(AxisOrder::RowMajor, Corner::NorthWest, grid, (row, col));
                assert_eq!(pos, TilePosition::new(row, col));
            }
        }
    }

    #[test]
    fn test_south_west_column_major_tms() {
        // 2 rows × 3 cols; the bottom-left tile is (0, 0) in TMS
        let grid = GridShape::new(2, 3);
        let pos = to_basis(AxisOrder::ColumnMajor, Corner::SouthWest, grid, (1, 0));
        assert_eq!(pos, TilePosition::new(0, 0));

        // Top-right tile: column 2, flipped row 1
        let pos = to_basis(AxisOrder::ColumnMajor, Corner::SouthWest, grid, (0, 2));
        assert_eq!(pos, TilePosition::new(2, 1));
    }

    #[test]
    fn test_north_east_reflects_column_only() {
        let grid = GridShape::new(2, 3);
        let pos = to_basis(AxisOrder::RowMajor, Corner::NorthEast, grid, (0, 0));
        assert_eq!(pos, TilePosition::new(0, 2));
    }

    #[test]
    fn test_south_east_reflects_both() {
        let grid = GridShape::new(2, 3);
        let pos = to_basis(AxisOrder::RowMajor, Corner::SouthEast, grid, (0, 0));
        assert_eq!(pos, TilePosition::new(1, 2));
    }

    #[test]
    fn test_single_tile_grid_maps_to_origin() {
        let grid = GridShape::new(1, 1);
        for corner in Corner::ALL {
            for order in AxisOrder::ALL {
                assert_eq!(
                    to_basis(order, corner, grid, (0, 0)),
                    TilePosition::new(0, 0)
                );
            }
        }
    }

    #[test]
    fn test_corner_parse_and_display() {
        for corner in Corner::ALL {
            assert_eq!(corner.to_string().parse::<Corner>().unwrap(), corner);
        }
        assert_eq!("SW".parse::<Corner>().unwrap(), Corner::SouthWest);
        assert_eq!("north_east".parse::<Corner>().unwrap(), Corner::NorthEast);
        assert!(matches!(
            "middle".parse::<Corner>(),
            Err(CoordError::UnknownCorner(_))
        ));
    }

    #[test]
    fn test_order_parse_and_display() {
        for order in AxisOrder::ALL {
            assert_eq!(order.to_string().parse::<AxisOrder>().unwrap(), order);
        }
        assert_eq!("ColMajor".parse::<AxisOrder>().unwrap(), AxisOrder::ColumnMajor);
        assert!("diagonal".parse::<AxisOrder>().is_err());
    }

    #[test]
    fn test_tile_shape_rejects_zero() {
        assert_eq!(
            TileShape::new(0, 256),
            Err(CoordError::InvalidTileShape {
                height: 0,
                width: 256
            })
        );
        assert!(TileShape::new(256, 0).is_err());
        assert_eq!(TileShape::default(), TileShape::square(256).unwrap());
    }

    #[test]
    fn test_tile_shape_grid_for() {
        let shape = TileShape::new(2, 3).unwrap();
        assert_eq!(shape.grid_for(4, 9), GridShape::new(2, 3));
        assert_eq!(shape.grid_for(5, 10), GridShape::new(3, 4));
        assert!(shape.divides(4, 9));
        assert!(!shape.divides(5, 9));
    }

    #[test]
    fn test_tile_address_display() {
        let address = TilePosition::new(3, 7).at_level(2);
        assert_eq!(address, TileAddress::new(2, 3, 7));
        assert_eq!(address.to_string(), "2/3/7");
        assert_eq!(address.position(), TilePosition::new(3, 7));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn corner() -> impl Strategy<Value = Corner> {
            prop::sample::select(Corner::ALL.to_vec())
        }

        fn order() -> impl Strategy<Value = AxisOrder> {
            prop::sample::select(AxisOrder::ALL.to_vec())
        }

        fn grid_and_index() -> impl Strategy<Value = (GridShape, (u32, u32))> {
            (1u32..64, 1u32..64).prop_flat_map(|(rows, cols)| {
                (Just(GridShape::new(rows, cols)), (0..rows, 0..cols))
            })
        }

        proptest! {
            #[test]
            fn test_basis_roundtrip(
                corner in corner(),
                order in order(),
                (grid, index) in grid_and_index()
            ) {
                let position = to_basis(order, corner, grid, index);
                prop_assert_eq!(from_basis(order, corner, grid, position), index);
            }

            #[test]
            fn test_basis_stays_in_grid(
                corner in corner(),
                order in order(),
                (grid, index) in grid_and_index()
            ) {
                let position = to_basis(order, corner, grid, index);
                let (major_extent, minor_extent) = match order {
                    AxisOrder::ColumnMajor => (grid.cols, grid.rows),
                    AxisOrder::RowMajor => (grid.rows, grid.cols),
                };
                prop_assert!(position.major < major_extent);
                prop_assert!(position.minor < minor_extent);
            }

            #[test]
            fn test_identity_basis(row in 0u32..1000, col in 0u32..1000) {
                let grid = GridShape::new(1000, 1000);
                prop_assert_eq!(
                    to_basis(AxisOrder::RowMajor, Corner::NorthWest, grid, (row, col)),
                    TilePosition::new(row, col)
                );
            }
        }
    }
}
