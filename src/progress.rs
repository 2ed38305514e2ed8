// src/progress.rs
/// Lightweight progress reporting for a contest-list pass.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of list entries.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A contest was crawled and its record written.
    fn item_done(&mut self, _id: &str) {}

    /// An entry was left alone (blank, already crawled, or incomplete).
    fn item_skipped(&mut self, _reason: &str) {}

    /// A contest could not be completed; it will be retried next pass.
    fn item_failed(&mut self, _id: &str, _error: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
