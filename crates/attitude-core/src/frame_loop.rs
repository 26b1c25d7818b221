/// Frame loop state.
///
/// `Terminating` is absorbing: once entered, the loop finishes the current
/// iteration and shuts down.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LoopState {
    #[default]
    Running,
    Terminating,
}

/// Reasons to leave `Running`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopEvent {
    /// The exit key was held during sampling.
    ExitKey,
    /// The window system asked to close the window.
    CloseRequested,
}

impl LoopState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }

    pub fn transition(self, event: LoopEvent) -> LoopState {
        match (self, event) {
            (LoopState::Running, LoopEvent::ExitKey | LoopEvent::CloseRequested) => {
                LoopState::Terminating
            }
            (LoopState::Terminating, _) => LoopState::Terminating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        assert!(LoopState::default().is_running());
    }

    #[test]
    fn exit_key_terminates() {
        assert_eq!(LoopState::Running.transition(LoopEvent::ExitKey), LoopState::Terminating);
    }

    #[test]
    fn close_request_terminates() {
        assert_eq!(
            LoopState::Running.transition(LoopEvent::CloseRequested),
            LoopState::Terminating
        );
    }

    #[test]
    fn terminating_is_absorbing() {
        let s = LoopState::Terminating;
        assert_eq!(s.transition(LoopEvent::ExitKey), LoopState::Terminating);
        assert_eq!(s.transition(LoopEvent::CloseRequested), LoopState::Terminating);
        assert!(!s.is_running());
    }
}
