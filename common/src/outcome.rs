use serde::Serialize;

use crate::error::Res;

/// Result of a best-effort side effect such as an SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    Completed,
    Failed,
    Skipped,
}

/// A core operation that succeeded, together with the fate of its side effect.
///
/// A failed side effect never turns the operation into an error.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub notification: SideEffect,
}

impl<T> Outcome<T> {
    /// Records the result of `attempt`, logging a failure instead of returning it.
    pub fn from_attempt(value: T, attempt: Res<()>, what: &str) -> Self {
        let notification = match attempt {
            Ok(()) => SideEffect::Completed,
            Err(e) => {
                log::warn!("{} failed: {}", what, e);
                SideEffect::Failed
            }
        };
        Outcome {
            value,
            notification,
        }
    }
}
