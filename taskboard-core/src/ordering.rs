//! Dense ordering helpers shared by the board engine and the board directory.

use crate::types::{Board, BoardColumn, Task};

/// Something carrying a zero-based position.
pub trait Positioned {
    fn set_position(&mut self, position: i64);
    fn position(&self) -> i64;
}

impl Positioned for Board {
    fn set_position(&mut self, position: i64) {
        self.position = Some(position);
    }

    fn position(&self) -> i64 {
        self.position.unwrap_or(-1)
    }
}

impl Positioned for BoardColumn {
    fn set_position(&mut self, position: i64) {
        self.position = position;
    }

    fn position(&self) -> i64 {
        self.position
    }
}

impl Positioned for Task {
    fn set_position(&mut self, position: i64) {
        self.position = position;
    }

    fn position(&self) -> i64 {
        self.position
    }
}

/// Remove the item at `from` and insert it at `to`; items in between shift by one.
/// Out-of-range indices leave the list untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Assign `position = index` to every entry.
pub fn reindex<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as i64);
    }
}

/// True when positions are exactly 0..len in order.
pub fn is_dense<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(id: i64, position: i64) -> BoardColumn {
        BoardColumn {
            id,
            name: format!("c{}", id),
            position,
        }
    }

    #[test]
    fn test_array_move_forward_and_back() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        array_move(&mut v, 0, 2);
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);
        array_move(&mut v, 3, 0);
        assert_eq!(v, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_array_move_out_of_range_is_noop() {
        let mut v = vec![1, 2, 3];
        array_move(&mut v, 5, 0);
        array_move(&mut v, 0, 3);
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_reindex_closes_gaps() {
        let mut cols = vec![col(1, 4), col(2, 9), col(3, 9)];
        assert!(!is_dense(&cols));
        reindex(&mut cols);
        assert!(is_dense(&cols));
        assert_eq!(cols[2].position, 2);
    }
}
