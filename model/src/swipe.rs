use crate::field::{Field, Position, Tile};
use Direction::{Down, Left, Right, Up};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Left, Right, Up, Down];
}

/// One tile that travelled or merged during a swipe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CellChange {
    pub from: Position,
    pub to: Position,
    /// Value of the tile now standing at `to`.
    pub value: u32,
    pub merged: bool,
}

/// Result of applying a direction to a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swipe {
    pub field: Field,
    pub score: u64,
    pub changes: Vec<CellChange>,
}

impl Swipe {
    pub fn moved(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[derive(Copy, Clone)]
struct Slot {
    tile: Tile,
    from: Position,
    merged_with: Option<Position>,
}

impl Slot {
    fn record(&self, to: Position, changes: &mut Vec<CellChange>) {
        let value = self.tile.value();
        match self.merged_with {
            Some(other) => {
                changes.push(CellChange {
                    from: self.from,
                    to,
                    value,
                    merged: true,
                });
                changes.push(CellChange {
                    from: other,
                    to,
                    value,
                    merged: true,
                });
            }
            None if self.from != to => changes.push(CellChange {
                from: self.from,
                to,
                value,
                merged: false,
            }),
            None => {}
        }
    }
}

/// Field index of the cell `offset` steps away from the edge the tiles move
/// towards, on the given line.
fn index_from_side(size: usize, side: Direction, line: usize, offset: usize) -> Position {
    match side {
        Up => (offset, line),
        Down => (size - 1 - offset, line),
        Left => (line, offset),
        Right => (line, size - 1 - offset),
    }
}

fn slide(line: &mut Vec<Option<Slot>>) {
    let len = line.len();
    let mut packed: Vec<Option<Slot>> = line.iter().flatten().copied().map(Some).collect();
    packed.resize(len, None);
    *line = packed;
}

fn merge(line: &mut [Option<Slot>]) -> u64 {
    let mut score = 0;
    let mut y = 0;
    while y + 1 < line.len() {
        if let (Some(dst), Some(src)) = (line[y], line[y + 1]) {
            let doubled = dst.tile.doubled().filter(|_| {
                dst.tile == src.tile && dst.merged_with.is_none() && src.merged_with.is_none()
            });
            if let Some(tile) = doubled {
                line[y] = Some(Slot {
                    tile,
                    from: dst.from,
                    merged_with: Some(src.from),
                });
                line[y + 1] = None;
                score += u64::from(tile.value());
                y += 2;
                continue;
            }
        }
        y += 1;
    }
    score
}

/// Applies `side` to `field` without touching it. The returned swipe holds the
/// new field, the points earned and every tile that changed.
pub fn swipe(field: &Field, side: Direction) -> Swipe {
    let size = field.size();
    let mut result = Field::new(size);
    let mut score = 0;
    let mut changes = Vec::new();
    for line in 0..size {
        let mut slots: Vec<Option<Slot>> = (0..size)
            .map(|offset| {
                let from = index_from_side(size, side, line, offset);
                field.at(from).map(|tile| Slot {
                    tile,
                    from,
                    merged_with: None,
                })
            })
            .collect();
        slide(&mut slots);
        score += merge(&mut slots);
        slide(&mut slots);
        for (offset, slot) in slots.iter().enumerate() {
            if let Some(slot) = slot {
                let to = index_from_side(size, side, line, offset);
                result.put(to, Some(slot.tile));
                slot.record(to, &mut changes);
            }
        }
    }
    Swipe {
        field: result,
        score,
        changes,
    }
}

pub fn can_swipe(field: &Field, side: Direction) -> bool {
    swipe(field, side).moved()
}


#[test]
fn swipe_up() {
    use crate::swipe::tests::{field, values};
    #[rustfmt::skip]
    let source = field(4, vec![
        0, 2, 4, 4,
        0, 2, 2, 4,
        0, 0, 2, 2,
        0, 0, 0, 2
    ]);
    let result = swipe(&source, Up);
    #[rustfmt::skip]
    assert_eq!(values(&result.field), vec![
        0, 4, 4, 8,
        0, 0, 4, 4,
        0, 0, 0, 0,
        0, 0, 0, 0
    ]);
    assert_eq!(result.score, 4 + 4 + 8 + 4);
    assert!(result.moved());
}

#[test]
fn swipe_down() {
    use crate::swipe::tests::{field, values};
    #[rustfmt::skip]
    let source = field(4, vec![
        0, 2, 4, 4,
        0, 2, 2, 4,
        0, 0, 2, 2,
        0, 0, 0, 2
    ]);
    let result = swipe(&source, Down);
    #[rustfmt::skip]
    assert_eq!(values(&result.field), vec![
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 4, 8,
        0, 4, 4, 4,
    ]);
}

#[test]
fn swipe_left() {
    use crate::swipe::tests::{field, values};
    #[rustfmt::skip]
    let source = field(4, vec![
        0, 2, 4, 4,
        0, 2, 2, 4,
        0, 0, 2, 2,
        0, 0, 0, 2
    ]);
    let result = swipe(&source, Left);
    #[rustfmt::skip]
    assert_eq!(values(&result.field), vec![
        2, 8, 0, 0,
        4, 4, 0, 0,
        4, 0, 0, 0,
        2, 0, 0, 0,
    ]);
    assert_eq!(result.score, 8 + 4 + 4);
}

#[test]
fn swipe_right() {
    use crate::swipe::tests::{field, values};
    #[rustfmt::skip]
    let source = field(4, vec![
        0, 2, 4, 4,
        0, 2, 2, 4,
        0, 0, 2, 2,
        0, 0, 0, 2
    ]);
    let result = swipe(&source, Right);
    #[rustfmt::skip]
    assert_eq!(values(&result.field), vec![
        0, 0, 2, 8,
        0, 0, 4, 4,
        0, 0, 0, 4,
        0, 0, 0, 2
    ]);
}

#[test]
fn swipe_does_not_chain_merges() {
    use crate::swipe::tests::{field, values};
    #[rustfmt::skip]
    let source = field(4, vec![
        2, 2, 2, 2,
        4, 2, 2, 0,
        8, 8, 16, 0,
        0, 0, 0, 0,
    ]);
    let result = swipe(&source, Left);
    #[rustfmt::skip]
    assert_eq!(values(&result.field), vec![
        4, 4, 0, 0,
        4, 4, 0, 0,
        16, 16, 0, 0,
        0, 0, 0, 0,
    ]);
    assert_eq!(result.score, 4 + 4 + 4 + 16);
}

#[test]
fn swipe_joins_distant_pair() {
    use crate::swipe::tests::{field, values};
    #[rustfmt::skip]
    let source = field(4, vec![
        2, 0, 0, 2,
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let result = swipe(&source, Left);
    assert_eq!(values(&result.field)[..4], [4, 0, 0, 0]);
    assert_eq!(result.score, 4);
    assert_eq!(
        result.changes,
        vec![
            CellChange {
                from: (0, 0),
                to: (0, 0),
                value: 4,
                merged: true
            },
            CellChange {
                from: (0, 3),
                to: (0, 0),
                value: 4,
                merged: true
            },
        ]
    );
}

#[test]
fn swipe_reports_only_changed_tiles() {
    use crate::swipe::tests::field;
    #[rustfmt::skip]
    let source = field(4, vec![
        2, 4, 0, 0,
        0, 0, 0, 8,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let result = swipe(&source, Left);
    assert_eq!(
        result.changes,
        vec![CellChange {
            from: (1, 3),
            to: (1, 0),
            value: 8,
            merged: false
        }]
    );
}

#[test]
fn swipe_merge_in_place_counts_as_move() {
    use crate::swipe::tests::field;
    #[rustfmt::skip]
    let source = field(2, vec![
        2, 2,
        4, 8,
    ]);
    assert!(can_swipe(&source, Left));
    assert!(can_swipe(&source, Right));
    assert!(!can_swipe(&source, Up));
    assert!(!can_swipe(&source, Down));
}

#[test]
fn swipe_blocked_leaves_field_as_is() {
    use crate::swipe::tests::field;
    #[rustfmt::skip]
    let source = field(4, vec![
        2, 4, 8, 16,
        4, 8, 16, 32,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let result = swipe(&source, Up);
    assert!(!result.moved());
    assert_eq!(result.score, 0);
    assert_eq!(result.field, source);
    assert!(can_swipe(&source, Down));
}

#[test]
fn swipe_keeps_largest_tiles_apart() {
    use crate::swipe::tests::{field, values};
    let top = 1 << 31;
    #[rustfmt::skip]
    let source = field(4, vec![
        top, top, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let blocked = swipe(&source, Left);
    assert!(!blocked.moved());
    assert_eq!(blocked.field, source);
    let slid = swipe(&source, Right);
    assert_eq!(values(&slid.field)[..4], [0, 0, top, top]);
    assert_eq!(slid.score, 0);
}
