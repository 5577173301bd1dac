//! Mode finding on top of [`SeparateChainingMap`].

use crate::SeparateChainingMap;

/// Returns the most frequent values and how often they occur.
///
/// Modal values are listed in order of first appearance. An empty input yields
/// `(vec![], 0)`.
///
/// ```rust
/// use probemap::find_mode;
///
/// let (mode, frequency) = find_mode(&["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(mode, vec!["apple".to_string()]);
/// assert_eq!(frequency, 2);
/// ```
#[must_use]
pub fn find_mode<T: AsRef<str>>(values: &[T]) -> (Vec<String>, usize) {
    let mut counts: SeparateChainingMap<usize> = SeparateChainingMap::default();
    let mut distinct = Vec::new();

    for value in values {
        let value = value.as_ref();
        match counts.get_mut(value) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                counts.put(value, 1);
                distinct.push(value);
            }
        }
    }

    let mut mode = Vec::new();
    let mut frequency = 0;
    for value in distinct {
        let count = counts.get(value).copied().unwrap_or_default();
        if count > frequency {
            frequency = count;
            mode.clear();
            mode.push(value.to_string());
        } else if count == frequency {
            mode.push(value.to_string());
        }
    }

    (mode, frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_single_mode() {
        let (mode, frequency) = find_mode(&["apple", "apple", "grape", "melon", "peach"]);
        assert_eq!(mode, owned(&["apple"]));
        assert_eq!(frequency, 2);
    }

    #[test]
    fn test_tied_modes() {
        let input =
            ["Arch", "Manjaro", "Manjaro", "Mint", "Mint", "Mint", "Ubuntu", "Ubuntu", "Ubuntu"];
        let (mode, frequency) = find_mode(&input);
        assert_eq!(mode, owned(&["Mint", "Ubuntu"]));
        assert_eq!(frequency, 3);
    }

    #[test]
    fn test_all_distinct() {
        let (mode, frequency) = find_mode(&["one", "two", "three", "four", "five"]);
        assert_eq!(mode, owned(&["one", "two", "three", "four", "five"]));
        assert_eq!(frequency, 1);
    }

    #[test]
    fn test_ties_keep_first_appearance_order() {
        let input = ["2", "4", "2", "6", "8", "4", "1", "3", "4", "5", "7", "3", "3", "2"];
        let (mode, frequency) = find_mode(&input);
        assert_eq!(mode, owned(&["2", "4", "3"]));
        assert_eq!(frequency, 3);
    }

    #[test]
    fn test_many_values_force_growth() {
        let input: Vec<String> = (0..100).flat_map(|i| vec![i.to_string(); i % 4 + 1]).collect();
        let (mode, frequency) = find_mode(&input);
        assert_eq!(frequency, 4);
        assert_eq!(mode.len(), 25);
        assert_eq!(mode.first().map(String::as_str), Some("3"));
    }

    #[test]
    fn test_empty_input() {
        let (mode, frequency) = find_mode::<&str>(&[]);
        assert!(mode.is_empty());
        assert_eq!(frequency, 0);
    }
}
