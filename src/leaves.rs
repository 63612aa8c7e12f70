//! The `leaves` document read by the web player.
//!
//! The player addresses fields by their position in a fixed array of nine
//! slots, so the layout below is a wire contract:
//!
//! ```json
//! {
//!   "leaves": [
//!     null, null, null, null,
//!     { "data": [[az, el, r], ...] },
//!     null,
//!     { "data": [sampling_rate] },
//!     null,
//!     { "data": [[[left...], [right...]], ...] }
//!   ]
//! }
//! ```

use crate::reader::{Hrtf, HrirPair};

use serde::Serialize;

/// Number of slots in the `leaves` array.
pub const LEAF_COUNT: usize = 9;

/// Meaning of the populated slots. The discriminant is the array index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Slot {
    SourcePosition = 4,
    SamplingRate = 6,
    ImpulseResponse = 8,
}

impl Slot {
    pub const ALL: [Slot; 3] = [
        Slot::SourcePosition,
        Slot::SamplingRate,
        Slot::ImpulseResponse,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LeafData<'a> {
    Positions(&'a [[f64; 3]]),
    SamplingRate([f64; 1]),
    ImpulseResponses(&'a [HrirPair]),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leaf<'a> {
    pub data: LeafData<'a>,
}

/// Borrows from the [`Hrtf`] it was built from; nothing is copied.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leaves<'a> {
    leaves: [Option<Leaf<'a>>; LEAF_COUNT],
}

impl<'a> Leaves<'a> {
    pub fn from_hrtf(hrtf: &'a Hrtf) -> Self {
        let mut leaves = Leaves {
            leaves: Default::default(),
        };

        leaves.set(Slot::SourcePosition, LeafData::Positions(&hrtf.positions));
        leaves.set(Slot::SamplingRate, LeafData::SamplingRate([hrtf.sampling_rate]));
        leaves.set(Slot::ImpulseResponse, LeafData::ImpulseResponses(&hrtf.responses));

        leaves
    }

    pub fn get(&self, slot: Slot) -> Option<&Leaf<'a>> {
        self.leaves[slot.index()].as_ref()
    }

    pub fn slots(&self) -> &[Option<Leaf<'a>>; LEAF_COUNT] {
        &self.leaves
    }

    fn set(&mut self, slot: Slot, data: LeafData<'a>) {
        self.leaves[slot.index()] = Some(Leaf { data });
    }
}
