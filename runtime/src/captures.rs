use std::ops::Range;

use crate::MAX_GROUPS;

/// Represents a save group as tracked over a single match attempt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SaveGroupSlot {
    #[default]
    None,
    Open {
        start: usize,
    },
    Complete {
        start: usize,
        end: usize,
    },
}

impl SaveGroupSlot {
    /// Returns a boolean representing if the savegroup slot is of the `None`
    /// variant, signifying the group was never entered.
    pub fn is_none(&self) -> bool {
        matches!(self, SaveGroupSlot::None)
    }

    pub const fn open(start: usize) -> Self {
        Self::Open { start }
    }

    /// Returns a completed save group from its constituent parts.
    pub const fn complete(start: usize, end: usize) -> Self {
        Self::Complete { start, end }
    }

    /// The non-inclusive range of a completed group.
    pub fn span(&self) -> Option<Range<usize>> {
        match *self {
            SaveGroupSlot::Complete { start, end } => Some(start..end),
            _ => None,
        }
    }
}

/// The capture table for a single match attempt, holding one slot per group.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Captures {
    slots: [SaveGroupSlot; MAX_GROUPS],
}

impl Captures {
    /// Returns the slot for a group, or `None` for an out of range group.
    pub fn get(&self, slot_id: usize) -> SaveGroupSlot {
        self.slots.get(slot_id).copied().unwrap_or_default()
    }

    pub fn span(&self, slot_id: usize) -> Option<Range<usize>> {
        self.get(slot_id).span()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SaveGroupSlot> {
        self.slots.iter()
    }

    pub(crate) fn open(&mut self, slot_id: usize, start: usize) {
        if let Some(slot) = self.slots.get_mut(slot_id) {
            *slot = SaveGroupSlot::open(start);
        }
    }

    pub(crate) fn close(&mut self, slot_id: usize, end: usize) {
        if let Some(slot) = self.slots.get_mut(slot_id) {
            *slot = match *slot {
                SaveGroupSlot::Open { start } | SaveGroupSlot::Complete { start, .. }
                    if start <= end =>
                {
                    SaveGroupSlot::complete(start, end)
                }
                // a group that was never opened stays unset.
                other => other,
            };
        }
    }
}
