use crate::route::model::{Route, Step};

/// Flattened view over all steps of all legs, in leg order then step order.
/// Rebuilt whenever a new route arrives and discarded with it.
#[derive(Debug, Clone)]
pub struct StepIndex {
    offsets: Vec<usize>,
    len: usize,
}

impl StepIndex {
    pub fn new(route: &Route) -> StepIndex {
        let mut offsets = Vec::with_capacity(route.legs().len());
        let mut len = 0;

        for leg in route.legs() {
            offsets.push(len);
            len += leg.steps().len();
        }

        StepIndex { offsets, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn flatten(&self, leg_index: usize, step_index: usize) -> Option<usize> {
        let offset = *self.offsets.get(leg_index)?;
        let leg_len = self
            .offsets
            .get(leg_index + 1)
            .copied()
            .unwrap_or(self.len)
            - offset;

        if step_index < leg_len {
            Some(offset + step_index)
        } else {
            None
        }
    }

    pub fn unflatten(&self, flat: usize) -> Option<(usize, usize)> {
        if flat >= self.len {
            return None;
        }

        let leg_index = match self.offsets.binary_search(&flat) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };

        Some((leg_index, flat - self.offsets[leg_index]))
    }

    pub fn step_at<'r>(&self, route: &'r Route, flat: usize) -> Option<(usize, &'r Step)> {
        let (leg_index, step_index) = self.unflatten(flat)?;
        let step = route.legs().get(leg_index)?.steps().get(step_index)?;
        Some((leg_index, step))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CursorState {
    Inactive,
    AtStep { index: usize, len: usize },
}

/// Single index into the flattened step sequence. Clamps at both ends and
/// reports whether a move actually happened so callers only re-render on
/// real transitions.
#[derive(Debug, Clone)]
pub struct StepCursor {
    state: CursorState,
}

impl StepCursor {
    pub fn inactive() -> StepCursor {
        StepCursor {
            state: CursorState::Inactive,
        }
    }

    /// Enters `AtStep(0)` for a non-empty sequence, `Inactive` otherwise.
    pub fn initialize(&mut self, len: usize) {
        self.state = if len > 0 {
            CursorState::AtStep { index: 0, len }
        } else {
            CursorState::Inactive
        };
    }

    pub fn clear(&mut self) {
        self.state = CursorState::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, CursorState::AtStep { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            CursorState::AtStep { index, .. } => Some(index),
            CursorState::Inactive => None,
        }
    }

    pub fn next(&mut self) -> bool {
        match &mut self.state {
            CursorState::AtStep { index, len } if *index + 1 < *len => {
                *index += 1;
                true
            }
            _ => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match &mut self.state {
            CursorState::AtStep { index, .. } if *index > 0 => {
                *index -= 1;
                true
            }
            _ => false,
        }
    }

    /// Moves directly to a flat index; no-op when inactive, out of range, or
    /// already there.
    pub fn jump_to(&mut self, target: usize) -> bool {
        match &mut self.state {
            CursorState::AtStep { index, len } if target < *len && target != *index => {
                *index = target;
                true
            }
            _ => false,
        }
    }
}
