//! Cyclic navigation over an ordered list of ids
//!
//! Callers enumerate the live collection fresh for every query and pass it
//! in as a slice. A `None` result means "leave the selection unchanged".

/// Euclidean remainder of `i` modulo `n` (`n` > 0)
pub fn modulo(i: isize, n: usize) -> usize {
    debug_assert!(n > 0);
    i.rem_euclid(n as isize) as usize
}

/// Position of `current` in `ordered`
pub fn index_of<T: PartialEq>(current: &T, ordered: &[T]) -> Option<usize> {
    ordered.iter().position(|id| id == current)
}

fn step<'a, T: PartialEq>(current: &T, ordered: &'a [T], delta: isize) -> Option<&'a T> {
    let index = index_of(current, ordered)?;
    let new_index = modulo(index as isize + delta, ordered.len());
    ordered.get(new_index)
}

/// The id after `current`, wrapping to the first
pub fn next<'a, T: PartialEq>(current: &T, ordered: &'a [T]) -> Option<&'a T> {
    step(current, ordered, 1)
}

/// The id before `current`, wrapping to the last
pub fn previous<'a, T: PartialEq>(current: &T, ordered: &'a [T]) -> Option<&'a T> {
    step(current, ordered, -1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulo_negative() {
        assert_eq!(modulo(-1, 4), 3);
        assert_eq!(modulo(4, 4), 0);
        assert_eq!(modulo(5, 4), 1);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let ids = [10u64, 20, 30, 40];
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(next(id, &ids), Some(&ids[(i + 1) % ids.len()]));
            assert_eq!(
                previous(id, &ids),
                Some(&ids[(i + ids.len() - 1) % ids.len()])
            );
        }
    }

    #[test]
    fn test_absent_current_is_noop() {
        let names = ["a", "b", "c"];
        assert_eq!(next(&"z", &names), None);
        assert_eq!(previous(&"z", &names), None);
        assert_eq!(next(&"a", &[] as &[&str]), None);
    }

    #[test]
    fn test_single_element_maps_to_itself() {
        let ids = [7u64];
        assert_eq!(next(&7, &ids), Some(&7));
        assert_eq!(previous(&7, &ids), Some(&7));
    }
}
