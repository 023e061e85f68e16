//! The 0 -> 1 -> 2 -> 0 click cycle.

use crate::geometry::{Point2D, VectorResult};

/// Something the rendering surface should draw in response to a click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawInstruction {
    Marker { at: Point2D },
    Arrow { from: Point2D, to: Point2D },
}

/// Result of feeding one click into the selection.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickOutcome {
    pub draw: Vec<DrawInstruction>,
    /// Present only when the click completed a pair.
    pub vector: Option<VectorResult>,
}

/// Up to two pending points. Capacity is enforced by the type: the second
/// slot is only ever filled transiently inside [`SelectionState::push`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    first: Option<Point2D>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        usize::from(self.first.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn points(&self) -> Vec<Point2D> {
        self.first.into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.first = None;
    }

    pub fn push(&mut self, point: Point2D) -> ClickOutcome {
        let marker = DrawInstruction::Marker { at: point };
        match self.first.take() {
            None => {
                self.first = Some(point);
                ClickOutcome {
                    draw: vec![marker],
                    vector: None,
                }
            }
            Some(p1) => ClickOutcome {
                draw: vec![marker, DrawInstruction::Arrow { from: p1, to: point }],
                vector: Some(VectorResult::between(p1, point)),
            },
        }
    }
}
