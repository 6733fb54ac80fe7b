//! Test sequence data model and generator

use crate::engine::EngineError;

/// The fixed alphabet letters are drawn from, in keyboard order.
pub const ALPHABET: &[char] = &[
    'Q', 'W', 'E', 'R', 'T', 'Y', 'U', 'I', 'O', 'P', 'A', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'L',
    'Z', 'X', 'C', 'V', 'B', 'N', 'M',
];

/// Ordered, descending list of target sizes in millimeters.
///
/// Fixed at construction; the generator cycles over it once per row.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeList(Vec<f64>);

impl SizeList {
    /// Build a descending list from `max` down to `min` in steps of `step`.
    ///
    /// All three values must be positive and `max >= min`.
    pub fn descending(max_mm: f64, min_mm: f64, step_mm: f64) -> Result<Self, EngineError> {
        if !(max_mm.is_finite() && min_mm.is_finite() && step_mm.is_finite())
            || max_mm <= 0.0
            || min_mm <= 0.0
            || step_mm <= 0.0
            || max_mm < min_mm
        {
            return Err(EngineError::InvalidSizeRange {
                max_mm,
                min_mm,
                step_mm,
            });
        }
        let mut sizes = Vec::new();
        let mut size = max_mm;
        while size >= min_mm {
            sizes.push(size);
            size -= step_mm;
        }
        Ok(Self(sizes))
    }

    /// The original default: 100 mm down to 5 mm in steps of 5 (20 values).
    pub fn default_range() -> Self {
        Self::descending(100.0, 5.0, 5.0).expect("default range is valid")
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size at position `i` of a sequence that cycles over this list.
    pub fn cyclic(&self, i: usize) -> f64 {
        self.0[i % self.0.len()]
    }
}

impl Default for SizeList {
    fn default() -> Self {
        Self::default_range()
    }
}

/// Classification outcome of a single test item.
///
/// Write-once: an item starts `Unknown` and is set at most once by the
/// tracker (subject to its reclassify policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureState {
    #[default]
    Unknown,
    /// The typed letter matched: legible at this size.
    Right,
    /// Space was pressed: not legible at this size.
    Wrong,
}

/// One (letter, target size) unit to be judged legible or not.
#[derive(Debug, Clone, PartialEq)]
pub struct TestItem {
    pub character: char,
    pub size_mm: f64,
    pub state: MeasureState,
}

impl TestItem {
    fn new(character: char, size_mm: f64) -> Self {
        Self {
            character,
            size_mm,
            state: MeasureState::Unknown,
        }
    }
}

/// The full ordered set of test items for a session.
///
/// Never resized or reordered after generation. Item state is mutated only
/// through [`set_state`](Self::set_state), which the tracker owns; observers
/// get a shared slice.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSequence {
    items: Vec<TestItem>,
}

impl TestSequence {
    pub fn items(&self) -> &[TestItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&TestItem> {
        self.items.get(index)
    }

    /// Set the state of the item at `index`. Tracker-internal.
    pub(crate) fn set_state(&mut self, index: usize, state: MeasureState) {
        self.items[index].state = state;
    }
}

/// Generate a randomized test sequence of length `rows * sizes.len()` over
/// the standard [`ALPHABET`].
///
/// Item `i` targets `sizes[i % sizes.len()]`, so the sequence is `rows`
/// contiguous passes over the size list. Deterministic for a seeded `rng`.
pub fn generate(
    sizes: &SizeList,
    rows: usize,
    rng: &mut fastrand::Rng,
) -> Result<TestSequence, EngineError> {
    generate_with_alphabet(ALPHABET, sizes, rows, rng)
}

/// [`generate`] over a caller-supplied alphabet.
///
/// Letters are uniform over the alphabet with no immediate repeats: instead
/// of redrawing until the letter differs, the previous letter is excluded
/// from the draw, which is still uniform over the remaining letters and
/// cannot loop. Alphabets with fewer than two letters skip the constraint.
pub fn generate_with_alphabet(
    alphabet: &[char],
    sizes: &SizeList,
    rows: usize,
    rng: &mut fastrand::Rng,
) -> Result<TestSequence, EngineError> {
    if rows == 0 || sizes.is_empty() || alphabet.is_empty() {
        return Err(EngineError::InvalidSequenceParams {
            rows,
            sizes: sizes.len(),
        });
    }

    let total = rows * sizes.len();
    let mut items = Vec::with_capacity(total);
    let mut last: Option<usize> = None;

    for i in 0..total {
        let idx = match last {
            Some(prev) if alphabet.len() >= 2 => {
                // Draw from the alphabet minus the previous letter.
                let mut idx = rng.usize(..alphabet.len() - 1);
                if idx >= prev {
                    idx += 1;
                }
                idx
            }
            _ => rng.usize(..alphabet.len()),
        };
        last = Some(idx);
        items.push(TestItem::new(alphabet[idx], sizes.cyclic(i)));
    }

    Ok(TestSequence { items })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_has_twenty_sizes() {
        let sizes = SizeList::default_range();
        assert_eq!(sizes.len(), 20);
        assert_eq!(sizes.values()[0], 100.0);
        assert_eq!(sizes.values()[19], 5.0);
    }

    #[test]
    fn default_range_is_descending_by_five() {
        let sizes = SizeList::default_range();
        for pair in sizes.values().windows(2) {
            assert_eq!(pair[0] - pair[1], 5.0);
        }
    }

    #[test]
    fn descending_rejects_bad_ranges() {
        assert!(SizeList::descending(0.0, 5.0, 5.0).is_err());
        assert!(SizeList::descending(100.0, -5.0, 5.0).is_err());
        assert!(SizeList::descending(100.0, 5.0, 0.0).is_err());
        assert!(SizeList::descending(5.0, 100.0, 5.0).is_err());
        assert!(SizeList::descending(f64::NAN, 5.0, 5.0).is_err());
    }

    #[test]
    fn generate_length_is_rows_times_sizes() {
        let sizes = SizeList::default_range();
        let mut rng = fastrand::Rng::with_seed(1);
        let seq = generate(&sizes, 5, &mut rng).unwrap();
        assert_eq!(seq.len(), 100);
    }

    #[test]
    fn generate_cycles_sizes_per_row() {
        let sizes = SizeList::descending(30.0, 10.0, 10.0).unwrap(); // 30, 20, 10
        let mut rng = fastrand::Rng::with_seed(2);
        let seq = generate(&sizes, 4, &mut rng).unwrap();
        assert_eq!(seq.len(), 12);
        for (i, item) in seq.items().iter().enumerate() {
            assert_eq!(item.size_mm, sizes.values()[i % 3]);
        }
    }

    #[test]
    fn generate_never_repeats_adjacent_letters() {
        let sizes = SizeList::default_range();
        for seed in 0..20 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let seq = generate(&sizes, 5, &mut rng).unwrap();
            for pair in seq.items().windows(2) {
                assert_ne!(pair[0].character, pair[1].character);
            }
        }
    }

    #[test]
    fn generate_all_states_start_unknown() {
        let sizes = SizeList::default_range();
        let mut rng = fastrand::Rng::with_seed(3);
        let seq = generate(&sizes, 2, &mut rng).unwrap();
        assert!(seq
            .items()
            .iter()
            .all(|item| item.state == MeasureState::Unknown));
    }

    #[test]
    fn generate_is_deterministic_for_a_seed() {
        let sizes = SizeList::default_range();
        let mut a = fastrand::Rng::with_seed(42);
        let mut b = fastrand::Rng::with_seed(42);
        let left = generate(&sizes, 3, &mut a).unwrap();
        let right = generate(&sizes, 3, &mut b).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn generate_letters_come_from_alphabet() {
        let sizes = SizeList::default_range();
        let mut rng = fastrand::Rng::with_seed(7);
        let seq = generate(&sizes, 5, &mut rng).unwrap();
        assert!(seq
            .items()
            .iter()
            .all(|item| ALPHABET.contains(&item.character)));
    }

    #[test]
    fn generate_rejects_zero_rows() {
        let sizes = SizeList::default_range();
        let mut rng = fastrand::Rng::with_seed(0);
        assert!(generate(&sizes, 0, &mut rng).is_err());
    }

    #[test]
    fn single_letter_alphabet_skips_no_repeat_constraint() {
        let sizes = SizeList::descending(20.0, 10.0, 10.0).unwrap();
        let mut rng = fastrand::Rng::with_seed(4);
        let seq = generate_with_alphabet(&['K'], &sizes, 3, &mut rng).unwrap();
        assert_eq!(seq.len(), 6);
        assert!(seq.items().iter().all(|item| item.character == 'K'));
    }

    #[test]
    fn two_letter_alphabet_alternates() {
        let sizes = SizeList::descending(20.0, 10.0, 10.0).unwrap();
        let mut rng = fastrand::Rng::with_seed(5);
        let seq = generate_with_alphabet(&['A', 'B'], &sizes, 10, &mut rng).unwrap();
        for pair in seq.items().windows(2) {
            assert_ne!(pair[0].character, pair[1].character);
        }
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        let sizes = SizeList::default_range();
        let mut rng = fastrand::Rng::with_seed(6);
        assert!(generate_with_alphabet(&[], &sizes, 1, &mut rng).is_err());
    }
}
