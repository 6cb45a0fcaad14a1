//! The seam between the pipeline and the transform engine
//!
//! The pipeline never touches the design itself. It checks the design's
//! selection state through [`DesignState`] and hands each [`Operation`] to a
//! [`TransformInvoker`], which applies it in place.

use crate::error::InvokeError;
use crate::operation::Operation;
use crate::stage::Stage;

/// What the pipeline needs to know about a design before running
pub trait DesignState {
    /// Whether the whole design is selected (no active sub-selection)
    fn is_fully_selected(&self) -> bool;
}

/// Applies transforms to a design, one at a time
pub trait TransformInvoker<D: DesignState + ?Sized> {
    /// Called before the first operation of each active stage
    fn enter_stage(&mut self, _design: &mut D, _stage: Stage) {}

    /// Apply `op` to `design`; returns once the transform has completed
    fn invoke(&mut self, design: &mut D, op: &Operation) -> Result<(), InvokeError>;
}

impl<D, I> TransformInvoker<D> for &mut I
where
    D: DesignState + ?Sized,
    I: TransformInvoker<D> + ?Sized,
{
    fn enter_stage(&mut self, design: &mut D, stage: Stage) {
        (**self).enter_stage(design, stage)
    }

    fn invoke(&mut self, design: &mut D, op: &Operation) -> Result<(), InvokeError> {
        (**self).invoke(design, op)
    }
}

/// Design handle with nothing but a selection flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOnly {
    pub fully_selected: bool,
}

impl SelectionOnly {
    pub fn full() -> Self {
        Self {
            fully_selected: true,
        }
    }

    pub fn partial() -> Self {
        Self {
            fully_selected: false,
        }
    }
}

impl DesignState for SelectionOnly {
    fn is_fully_selected(&self) -> bool {
        self.fully_selected
    }
}

/// Invoker that records every operation it receives
///
/// Optionally fails on the first operation whose command text equals
/// `fail_on`, after recording it.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvoker {
    calls: Vec<Operation>,
    fail_on: Option<String>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when an operation renders to exactly `text`
    pub fn failing_on(text: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(text.into()),
        }
    }

    pub fn calls(&self) -> &[Operation] {
        &self.calls
    }

    /// Recorded operations as command text
    pub fn commands(&self) -> Vec<String> {
        self.calls.iter().map(ToString::to_string).collect()
    }

    pub fn into_calls(self) -> Vec<Operation> {
        self.calls
    }
}

impl<D: DesignState + ?Sized> TransformInvoker<D> for RecordingInvoker {
    fn invoke(&mut self, _design: &mut D, op: &Operation) -> Result<(), InvokeError> {
        self.calls.push(op.clone());
        match &self.fail_on {
            Some(text) if *text == op.to_string() => {
                Err(InvokeError::Failed(format!("{} rejected the design", op.command())))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_invoker() {
        let mut design = SelectionOnly::full();
        let mut invoker = RecordingInvoker::new();
        invoker.invoke(&mut design, &Operation::Proc).unwrap();
        invoker.invoke(&mut design, &Operation::Stat).unwrap();
        assert_eq!(invoker.commands(), vec!["proc", "stat"]);
    }

    #[test]
    fn test_recording_invoker_failure() {
        let mut design = SelectionOnly::full();
        let mut invoker = RecordingInvoker::failing_on("stat");
        invoker.invoke(&mut design, &Operation::Proc).unwrap();
        let err = invoker.invoke(&mut design, &Operation::Stat).unwrap_err();
        assert_eq!(err.to_string(), "stat rejected the design");
        assert_eq!(invoker.calls().len(), 2);
    }

    #[test]
    fn test_invoke_through_reference() {
        let mut design = SelectionOnly::full();
        let mut invoker = RecordingInvoker::new();
        fn clean<I: TransformInvoker<SelectionOnly>>(mut invoker: I, design: &mut SelectionOnly) {
            invoker.invoke(design, &Operation::Clean).unwrap();
        }
        clean(&mut invoker, &mut design);
        assert_eq!(invoker.into_calls(), vec![Operation::Clean]);
    }
}
