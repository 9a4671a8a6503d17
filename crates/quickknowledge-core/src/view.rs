//! View state for anything that loads asynchronously.
//!
//! `Idle → Loading → Loaded | Failed`, and back to `Loading` on the next
//! request. A failed load keeps nothing from the previous one; surfaces
//! decide whether to show the error placeholder or keep what they last
//! rendered.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn begin(&mut self) {
        *self = ViewState::Loading;
    }

    /// Settle a load started with [`begin`](Self::begin).
    pub fn finish<E: std::fmt::Display>(&mut self, outcome: Result<T, E>) {
        *self = match outcome {
            Ok(data) => ViewState::Loaded(data),
            Err(e) => ViewState::Failed(e.to_string()),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
