use std::fmt;

use ndarray::Array2;

use crate::error::{Error, Result};

/// `(row, col)`, `(0, 0)` is the top-left cell.
pub type Position = (usize, usize);

/// Tile stores the power of two, so every tile value is 2, 4, 8, ...
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Tile(u32);

impl Tile {
    pub const TWO: Tile = Tile(1);
    pub const FOUR: Tile = Tile(2);
    /// 2^31 is the largest value a `u32` holds; such tiles no longer merge.
    pub const MAX_LEVEL: u32 = 31;

    pub fn from_value(value: u32) -> Option<Self> {
        if value >= 2 && value.count_ones() == 1 {
            Some(Tile(value.trailing_zeros()))
        } else {
            None
        }
    }
    pub fn level(self) -> u32 {
        self.0
    }
    pub fn value(self) -> u32 {
        1 << self.0
    }
    pub fn doubled(self) -> Option<Self> {
        if self.0 < Self::MAX_LEVEL {
            Some(Tile(self.0 + 1))
        } else {
            None
        }
    }
}

impl From<Tile> for u32 {
    fn from(tile: Tile) -> u32 {
        tile.value()
    }
}

/// Square grid of optional tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field(Array2<Option<Tile>>);

impl Field {
    pub fn new(size: usize) -> Self {
        Self(Array2::default((size, size)))
    }
    pub fn from_array(array: &Array2<u32>) -> Result<Self> {
        let (h, w) = (array.nrows(), array.ncols());
        if h != w {
            return Err(Error::Format(format!("field must be square, got {}x{}", h, w)));
        }
        let mut field = Self::new(w);
        for (index, &v) in array.indexed_iter() {
            field.0[index] = match v {
                0 => None,
                v => Some(Tile::from_value(v).ok_or_else(|| {
                    Error::Format(format!(
                        "value {} at {:?} is not 0 or a power of two",
                        v, index
                    ))
                })?),
            };
        }
        Ok(field)
    }
    pub fn to_array(&self) -> Array2<u32> {
        self.0.map(|cell| cell.map_or(0, u32::from))
    }
    pub fn size(&self) -> usize {
        self.0.nrows()
    }
    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        Error::OutOfBounds {
            row,
            col,
            size: self.size(),
        }
    }
    pub fn get(&self, row: usize, col: usize) -> Result<Option<Tile>> {
        self.0
            .get((row, col))
            .copied()
            .ok_or_else(|| self.out_of_bounds(row, col))
    }
    pub fn set(&mut self, row: usize, col: usize, cell: Option<Tile>) -> Result<()> {
        let size = self.size();
        let slot = self
            .0
            .get_mut((row, col))
            .ok_or(Error::OutOfBounds { row, col, size })?;
        *slot = cell;
        Ok(())
    }
    // Unchecked access for the move engine, which only walks valid indices.
    pub(crate) fn at(&self, pos: Position) -> Option<Tile> {
        self.0[pos]
    }
    pub(crate) fn put(&mut self, pos: Position, cell: Option<Tile>) {
        self.0[pos] = cell;
    }
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
    pub fn empty_cells(&self) -> Vec<Position> {
        self.0
            .indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
            .collect()
    }
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.0
            .indexed_iter()
            .filter_map(|(pos, cell)| cell.map(|tile| (pos, tile)))
    }
    /// True if some horizontally or vertically adjacent tiles can merge.
    pub fn has_adjacent_pair(&self) -> bool {
        let size = self.size();
        self.tiles().any(|((row, col), tile)| {
            tile.doubled().is_some()
                && ((row + 1 < size && self.at((row + 1, col)) == Some(tile))
                    || (col + 1 < size && self.at((row, col + 1)) == Some(tile)))
        })
    }
    pub fn max_value(&self) -> Option<u32> {
        self.tiles().map(|(_, tile)| tile.value()).max()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_value().unwrap_or(0).to_string().len().max(1);
        for row in self.0.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(tile) => format!("{:>w$}", tile.value(), w = width),
                    None => format!("{:>w$}", ".", w = width),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[test]
fn tile_from_value() {
    assert_eq!(Tile::from_value(2).map(Tile::level), Some(1));
    assert_eq!(Tile::from_value(2048).map(Tile::value), Some(2048));
    assert_eq!(Tile::from_value(0), None);
    assert_eq!(Tile::from_value(1), None);
    assert_eq!(Tile::from_value(6), None);
    assert_eq!(u32::from(Tile::from_value(8).unwrap().doubled().unwrap()), 16);
}

#[test]
fn tile_stops_doubling_at_max_level() {
    let top = Tile::from_value(1 << 31).unwrap();
    assert_eq!(top.level(), Tile::MAX_LEVEL);
    assert_eq!(top.doubled(), None);
    assert_eq!(
        Tile::from_value(1 << 30).unwrap().doubled(),
        Some(top)
    );
}

#[test]
fn field_from_array() {
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((4, 4), vec![
        8, 4, 2, 0,
        4, 2, 0, 0,
        2, 0, 0, 0,
        0, 0, 0, 16
    ]).unwrap();
    let field = Field::from_array(&array).unwrap();
    assert_eq!(field.size(), 4);
    assert_eq!(field.get(0, 0).unwrap(), Tile::from_value(8));
    assert_eq!(field.get(1, 1).unwrap(), Tile::from_value(2));
    assert_eq!(field.get(3, 3).unwrap(), Tile::from_value(16));
    assert_eq!(field.get(3, 0).unwrap(), None);
    assert_eq!(field.to_array(), array);
}

#[test]
fn field_from_array_rejects_bad_values() {
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((2, 2), vec![
        2, 3,
        0, 0,
    ]).unwrap();
    assert!(matches!(Field::from_array(&array), Err(Error::Format(_))));
    let ones = Array2::from_elem((2, 2), 1);
    assert!(matches!(Field::from_array(&ones), Err(Error::Format(_))));
    let wide = Array2::zeros((2, 3));
    assert!(matches!(Field::from_array(&wide), Err(Error::Format(_))));
}

#[test]
fn field_get_set_bounds() {
    let mut field = Field::new(4);
    field.set(2, 3, Tile::from_value(4)).unwrap();
    assert_eq!(field.get(2, 3).unwrap(), Tile::from_value(4));
    assert!(matches!(
        field.get(4, 0),
        Err(Error::OutOfBounds { row: 4, col: 0, size: 4 })
    ));
    assert!(matches!(
        field.set(0, 7, None),
        Err(Error::OutOfBounds { .. })
    ));
}

#[test]
fn field_empty_cells_and_full() {
    let mut field = Field::new(2);
    assert_eq!(field.empty_cells(), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    field.put((0, 1), Tile::from_value(2));
    field.put((1, 0), Tile::from_value(4));
    assert_eq!(field.empty_cells(), vec![(0, 0), (1, 1)]);
    assert!(!field.is_full());
    field.put((0, 0), Tile::from_value(8));
    field.put((1, 1), Tile::from_value(16));
    assert!(field.is_full());
    assert!(field.empty_cells().is_empty());
}

#[test]
fn field_adjacent_pairs() {
    #[rustfmt::skip]
    let checkered = Array2::from_shape_vec((3, 3), vec![
        2, 4, 2,
        4, 2, 4,
        2, 4, 2,
    ]).unwrap();
    assert!(!Field::from_array(&checkered).unwrap().has_adjacent_pair());
    #[rustfmt::skip]
    let vertical = Array2::from_shape_vec((3, 3), vec![
        2, 4, 2,
        4, 2, 8,
        2, 4, 8,
    ]).unwrap();
    assert!(Field::from_array(&vertical).unwrap().has_adjacent_pair());
    #[rustfmt::skip]
    let topped = Array2::from_shape_vec((2, 2), vec![
        1 << 31, 1 << 31,
        2, 4,
    ]).unwrap();
    assert!(!Field::from_array(&topped).unwrap().has_adjacent_pair());
}

#[test]
fn field_display() {
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((2, 2), vec![
        2, 0,
        0, 16,
    ]).unwrap();
    let field = Field::from_array(&array).unwrap();
    assert_eq!(field.to_string(), " 2  .\n . 16\n");
}
