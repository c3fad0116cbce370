// Queue Position Rules
//
// Pure functions over entry snapshots. Persistence and locking live in the
// application layer; everything here is deterministic and order-independent.

use crate::domain::entry::{PriorityClass, Position, QueueEntry};
use crate::domain::error::Result;
use chrono::{DateTime, Utc};

/// Display format of `joined_at`
pub const JOINED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Position assigned to a newcomer of `class`: active count + 1
pub fn next_position(active: &[QueueEntry], class: PriorityClass) -> Position {
    let ahead = active
        .iter()
        .filter(|e| e.is_active() && e.class == class)
        .count();
    ahead as Position + 1
}

/// Move every active entry of `class` one step forward.
///
/// Returns only the entries that changed, sorted by their previous position.
/// Persisting them in this order never produces two active entries sharing a
/// position, even transiently.
pub fn shift_class(
    entries: impl IntoIterator<Item = QueueEntry>,
    class: PriorityClass,
) -> Result<Vec<QueueEntry>> {
    let mut moved: Vec<QueueEntry> = entries
        .into_iter()
        .filter(|e| e.is_active() && e.class == class)
        .collect();
    moved.sort_by_key(|e| (e.position, e.id));

    for entry in moved.iter_mut() {
        entry.step_forward()?;
    }

    Ok(moved)
}

/// True when the active positions of `class` are exactly `1..=k`
pub fn is_contiguous(entries: &[QueueEntry], class: PriorityClass) -> bool {
    let mut positions: Vec<Position> = entries
        .iter()
        .filter(|e| e.is_active() && e.class == class)
        .map(|e| e.position)
        .collect();
    positions.sort_unstable();

    positions
        .iter()
        .enumerate()
        .all(|(i, &p)| p == i as Position + 1)
}

/// Render an epoch-millis timestamp the way entries expose it
pub fn format_joined_at(now_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(now_millis)
        .unwrap_or_default()
        .format(JOINED_AT_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use PriorityClass::{Normal, Preferential};

    fn entry(id: i64, class: PriorityClass, position: Position) -> QueueEntry {
        QueueEntry::new(id, format!("person-{}", id), class, position, "01/01/2024 00:00:00")
    }

    fn served(id: i64, class: PriorityClass) -> QueueEntry {
        let mut e = entry(id, class, 1);
        e.step_forward().unwrap();
        e
    }

    #[test]
    fn test_next_position_counts_only_same_class() {
        let active = vec![
            entry(1, Preferential, 1),
            entry(2, Normal, 1),
            entry(3, Preferential, 2),
        ];
        assert_eq!(next_position(&active, Preferential), 3);
        assert_eq!(next_position(&active, Normal), 2);
        assert_eq!(next_position(&[], Normal), 1);
    }

    #[test]
    fn test_next_position_ignores_served() {
        let entries = vec![served(1, Normal), entry(2, Normal, 1)];
        assert_eq!(next_position(&entries, Normal), 2);
    }

    #[test]
    fn test_shift_decrements_every_active_entry_once() {
        let entries = vec![
            entry(1, Preferential, 1),
            entry(2, Preferential, 2),
            entry(3, Preferential, 3),
        ];
        let moved = shift_class(entries, Preferential).unwrap();

        assert_eq!(moved.len(), 3);
        assert_eq!((moved[0].id, moved[0].position, moved[0].served), (1, 0, true));
        assert_eq!((moved[1].id, moved[1].position, moved[1].served), (2, 1, false));
        assert_eq!((moved[2].id, moved[2].position, moved[2].served), (3, 2, false));
        assert!(is_contiguous(&moved, Preferential));
    }

    #[test]
    fn test_shift_leaves_other_class_and_served_alone() {
        let entries = vec![
            served(1, Preferential),
            entry(2, Preferential, 1),
            entry(3, Normal, 1),
        ];
        let moved = shift_class(entries, Preferential).unwrap();

        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, 2);
        assert!(moved[0].served);
    }

    #[test]
    fn test_shift_is_order_independent() {
        let forward = vec![
            entry(1, Normal, 1),
            entry(2, Normal, 2),
            entry(3, Normal, 3),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            shift_class(forward, Normal).unwrap(),
            shift_class(backward, Normal).unwrap()
        );
    }

    #[test]
    fn test_is_contiguous_detects_gaps_and_duplicates() {
        assert!(is_contiguous(&[], Normal));
        assert!(!is_contiguous(
            &[entry(1, Normal, 1), entry(2, Normal, 3)],
            Normal
        ));
        assert!(!is_contiguous(
            &[entry(1, Normal, 1), entry(2, Normal, 1)],
            Normal
        ));
        assert!(!is_contiguous(&[entry(1, Normal, 2)], Normal));
    }

    #[test]
    fn test_format_joined_at() {
        // 2024-03-05T14:07:09Z
        assert_eq!(format_joined_at(1_709_647_629_000), "05/03/2024 14:07:09");
    }
}
