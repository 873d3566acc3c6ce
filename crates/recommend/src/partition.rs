use std::collections::BTreeSet;

/// Split `values` into (in `divisor`, not in `divisor`), stopping early
///
/// `keep_going` is consulted after every value with the two buckets built so
/// far; returning `false` stops the scan and leaves the rest untouched.
pub fn divide_while<T, I, F>(values: I, divisor: &BTreeSet<T>, mut keep_going: F) -> (Vec<T>, Vec<T>)
where
    T: Ord,
    I: IntoIterator<Item = T>,
    F: FnMut(&[T], &[T]) -> bool,
{
    let mut inside = Vec::new();
    let mut outside = Vec::new();

    for value in values {
        if divisor.contains(&value) {
            inside.push(value);
        } else {
            outside.push(value);
        }

        if !keep_going(&inside, &outside) {
            break;
        }
    }

    (inside, outside)
}
