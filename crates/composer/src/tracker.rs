/// Edge-triggered change detector.
///
/// Remembers the last value it was shown and reports whether a newly observed
/// value differs from it. The first observation always counts as a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTracker<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> ChangeTracker<T> {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Records `value` and returns true when it differs from the previous observation.
    pub fn observe(&mut self, value: &T) -> bool {
        if self.last.as_ref() == Some(value) {
            return false;
        }

        self.last = Some(value.clone());
        true
    }
}

impl<T: PartialEq + Clone> Default for ChangeTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
