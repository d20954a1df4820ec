use serde::{Deserialize, Serialize};

/// Study-plan days the user has ticked off, in the order they were ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedStudyDays(Vec<u32>);

impl CompletedStudyDays {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the completion state of `day_id`; returns whether it is now completed.
    pub fn toggle(&mut self, day_id: u32) -> bool {
        if let Some(pos) = self.0.iter().position(|d| *d == day_id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(day_id);
            true
        }
    }

    #[must_use]
    pub fn is_completed(&self, day_id: u32) -> bool {
        self.0.contains(&day_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for CompletedStudyDays {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut days = Self::new();
        for day in iter {
            if !days.is_completed(day) {
                days.0.push(day);
            }
        }
        days
    }
}
