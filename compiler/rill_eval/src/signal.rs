//! Control signals for `return`, `break` and `continue`.
//!
//! Signals are ordinary return values, not errors: every statement closure
//! yields a `Completion`, and each executor that runs nested statements checks
//! it before continuing. Loops consume `break`/`continue`, switches consume
//! `break`, and function calls consume `return`.

use crate::errors::EvalError;
use crate::Value;

/// A non-local exit in flight.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlSignal {
    Return(Value),
    Break,
    Continue,
}

/// Outcome of running a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// The statement ran to its end and produced a value.
    Normal(Value),
    /// The statement was cut short by a signal.
    Signal(ControlSignal),
}

/// Result of running a statement.
pub type ExecResult = Result<Completion, EvalError>;

impl Completion {
    #[inline]
    pub fn undefined() -> Self {
        Completion::Normal(Value::Undefined)
    }

    /// Classify a loop body's completion.
    pub(crate) fn into_loop_action(self) -> LoopAction {
        match self {
            Completion::Normal(_) | Completion::Signal(ControlSignal::Continue) => {
                LoopAction::Next
            }
            Completion::Signal(ControlSignal::Break) => LoopAction::Exit,
            Completion::Signal(ControlSignal::Return(value)) => LoopAction::Return(value),
        }
    }
}

/// What a loop does after one iteration of its body.
#[derive(Debug, PartialEq)]
pub(crate) enum LoopAction {
    /// Run the update (if any) and test again.
    Next,
    /// Leave the loop.
    Exit,
    /// Leave the loop and propagate `return`.
    Return(Value),
}

impl LoopAction {
    /// The loop statement's own completion when the loop ends this way.
    pub(crate) fn finish(self) -> Completion {
        match self {
            LoopAction::Return(value) => Completion::Signal(ControlSignal::Return(value)),
            LoopAction::Next | LoopAction::Exit => Completion::undefined(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_actions() {
        assert_eq!(
            Completion::Normal(Value::from(1)).into_loop_action(),
            LoopAction::Next
        );
        assert_eq!(
            Completion::Signal(ControlSignal::Continue).into_loop_action(),
            LoopAction::Next
        );
        assert_eq!(
            Completion::Signal(ControlSignal::Break).into_loop_action(),
            LoopAction::Exit
        );
        assert_eq!(
            Completion::Signal(ControlSignal::Return(Value::from(3))).into_loop_action(),
            LoopAction::Return(Value::from(3))
        );
    }

    #[test]
    fn only_return_escapes_a_loop() {
        assert_eq!(LoopAction::Exit.finish(), Completion::undefined());
        assert_eq!(
            LoopAction::Return(Value::Null).finish(),
            Completion::Signal(ControlSignal::Return(Value::Null))
        );
    }
}
