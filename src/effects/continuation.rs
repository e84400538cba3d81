//! The continuation stack: suspended effect evaluation as data.
//!
//! When an effect needs a card selection, the interpreter cannot block;
//! the answer arrives in a later network message. Instead, each level of
//! the interrupted recursion pushes one [`ContinuationFrame`] recording
//! the node being evaluated, how far through its children it got, and
//! the action that started the chain. The resulting chain runs from the
//! outermost node at the head down to the suspending leaf. Resuming
//! re-enters the interpreter, which pops one frame per recursion level
//! and picks up exactly where it left off.

use crate::core::Action;
use crate::effects::Effect;

/// One interrupted level of effect evaluation.
#[derive(Clone, Debug)]
pub struct ContinuationFrame {
    /// The effect node this level was evaluating.
    pub effect: Effect,

    /// For `THEN` nodes, the child index to resume at. Zero elsewhere.
    pub resume_index: usize,

    /// The action that started the whole effect chain.
    pub inciting: Action,

    /// The next level inward, toward the suspending leaf.
    inner: Option<Box<ContinuationFrame>>,
}

/// A paused effect evaluation, outermost frame first.
#[derive(Clone, Debug, Default)]
pub struct ContinuationStack {
    head: Option<Box<ContinuationFrame>>,
}

impl ContinuationStack {
    /// An empty stack: nothing suspended.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a suspended evaluation is waiting to be resumed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.head.is_some()
    }

    /// Record one interrupted level.
    ///
    /// Levels suspend leaf-first, so each push wraps the frames already
    /// present and the head is always the outermost node.
    pub fn push(&mut self, effect: Effect, resume_index: usize, inciting: Action) {
        let frame = Box::new(ContinuationFrame {
            effect,
            resume_index,
            inciting,
            inner: self.head.take(),
        });
        self.head = Some(frame);
    }

    /// Detach and return the outermost frame.
    pub fn pop(&mut self) -> Option<ContinuationFrame> {
        let mut frame = self.head.take()?;
        self.head = frame.inner.take();
        Some(*frame)
    }

    /// The innermost frame: the leaf that actually suspended.
    #[must_use]
    pub fn innermost(&self) -> Option<&ContinuationFrame> {
        let mut frame = self.head.as_deref()?;
        while let Some(inner) = frame.inner.as_deref() {
            frame = inner;
        }
        Some(frame)
    }

    /// How many recursion levels are suspended.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            depth += 1;
            frame = f.inner.as_deref();
        }
        depth
    }

    /// Drop every pending frame.
    pub fn clear(&mut self) {
        self.head = None;
    }
}
