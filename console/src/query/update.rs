//! Replace-by-index helpers over ordered sequences.
//!
//! Each helper returns a fresh `Vec` and leaves its input untouched, so an
//! in-progress edit never aliases committed state. `None` means the index was
//! out of range.

pub fn replace_at<T: Clone>(items: &[T], index: usize, value: T) -> Option<Vec<T>> {
    if index >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    next[index] = value;
    Some(next)
}

pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Option<Vec<T>> {
    if index >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    next.remove(index);
    Some(next)
}

pub fn appended<T: Clone>(items: &[T], value: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(value);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_at() {
        let items = vec![1, 2, 3];
        assert_eq!(replace_at(&items, 1, 9), Some(vec![1, 9, 3]));
        assert_eq!(replace_at(&items, 3, 9), None);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_and_append() {
        let items = vec![1, 2, 3];
        assert_eq!(remove_at(&items, 0), Some(vec![2, 3]));
        assert_eq!(remove_at(&items, 7), None);
        assert_eq!(appended(&items, 4), vec![1, 2, 3, 4]);
    }
}
