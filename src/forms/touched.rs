use std::collections::BTreeSet;

/// Fields the user has interacted with on the current step.
///
/// An error is only surfaced for a field present here, so a freshly opened
/// step never greets the user with a wall of "required" messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedSet {
    fields: BTreeSet<String>,
}

impl TouchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_touched(&mut self, field: impl Into<String>) {
        self.fields.insert(field.into());
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Force-marks every field in `fields`, used after a blocked advance.
    pub fn touch_all<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
    }

    pub fn reset_for_step(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_until_reset() {
        let mut touched = TouchedSet::new();
        assert!(touched.is_empty());
        touched.mark_touched("email");
        touched.mark_touched("email");
        touched.touch_all(["phone", "name"]);
        assert_eq!(touched.len(), 3);
        assert!(touched.is_touched("phone"));
        touched.reset_for_step();
        assert!(!touched.is_touched("email"));
        assert!(touched.is_empty());
    }
}
