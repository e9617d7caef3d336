//! Trait abstraction for action output to enable testing

use crate::error::Result;
use crate::scratch::Action;

/// Receives detector actions and turns them into key events.
pub trait ActionSink {
    /// Apply one action.
    ///
    /// `Release` carries no direction; implementations release whichever key
    /// their last press put down.
    fn apply(&mut self, action: Action) -> Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::ScratchError;
    use std::sync::{Arc, Mutex};

    /// Mock sink that records every applied action
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub applied: Arc<Mutex<Vec<Action>>>,
        pub fail: Arc<Mutex<bool>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn actions(&self) -> Vec<Action> {
            self.applied.lock().unwrap().clone()
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl ActionSink for RecordingSink {
        fn apply(&mut self, action: Action) -> Result<()> {
            if *self.fail.lock().unwrap() {
                return Err(ScratchError::VirtualKeyboard("Mock emit error".to_string()));
            }
            self.applied.lock().unwrap().push(action);
            Ok(())
        }
    }
}
