/// Aggregated view of session progress, useful for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub current_index: usize,
    pub is_complete: bool,
}
