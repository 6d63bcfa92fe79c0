//! Zone numbering
//!
//! Maps external zone numbers (as known to model users and files) to the
//! dense internal positions that back matrix storage.
//!
//! Legacy arrays reserve position 0 and start zone numbers at position 1.
//! [`ZoneIndex`] keeps no reserved slot; [`ZoneIndex::from_one_based`] and
//! [`ZoneIndex::to_one_based`] convert at the boundary.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::{MatrixError, Result};

/// Bidirectional mapping between external zone numbers and internal positions
#[derive(Debug, Clone)]
pub struct ZoneIndex {
    external: Vec<i32>,
    internal: HashMap<i32, usize>,
}

impl ZoneIndex {
    /// Build an index from zone numbers in presentation order
    pub fn new(zones: &[i32]) -> Result<Self> {
        let mut internal = HashMap::with_capacity(zones.len());
        for (position, &zone) in zones.iter().enumerate() {
            if internal.insert(zone, position).is_some() {
                return Err(MatrixError::DuplicateZone { zone });
            }
        }

        Ok(Self {
            external: zones.to_vec(),
            internal,
        })
    }

    /// Sequential numbering `1..=count`
    ///
    /// Zone numbers are `i32`, so `count` cannot exceed `i32::MAX`.
    pub fn sequential(count: usize) -> Result<Self> {
        let last = i32::try_from(count).map_err(|_| MatrixError::TooManyZones { count })?;
        let external: Vec<i32> = (1..=last).collect();
        let internal = external
            .iter()
            .enumerate()
            .map(|(position, &zone)| (zone, position))
            .collect();
        Ok(Self { external, internal })
    }

    /// Build from a legacy array whose position 0 is unused
    pub fn from_one_based(zones: &[i32]) -> Result<Self> {
        match zones.split_first() {
            Some((_, rest)) => Self::new(rest),
            None => Self::new(&[]),
        }
    }

    /// Legacy layout: a leading `0` followed by the zone numbers
    pub fn to_one_based(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.external.len() + 1);
        out.push(0);
        out.extend_from_slice(&self.external);
        out
    }

    /// Internal position of an external zone number
    pub fn internal_of(&self, zone: i32) -> Result<usize> {
        self.internal
            .get(&zone)
            .copied()
            .ok_or(MatrixError::UnknownZone { zone })
    }

    /// External zone number at an internal position
    pub fn external_of(&self, position: usize) -> Result<i32> {
        self.external
            .get(position)
            .copied()
            .ok_or(MatrixError::IndexOutOfRange {
                index: position,
                len: self.external.len(),
            })
    }

    pub fn contains(&self, zone: i32) -> bool {
        self.internal.contains_key(&zone)
    }

    pub fn len(&self) -> usize {
        self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.external.is_empty()
    }

    /// Zone numbers in presentation order
    pub fn as_slice(&self) -> &[i32] {
        &self.external
    }

    /// Highest zone number, if any
    pub fn max_zone(&self) -> Option<i32> {
        self.external.iter().copied().max()
    }

    /// Iterate zone numbers in presentation order
    pub fn iter(&self) -> ZoneIter<'_> {
        ZoneIter {
            inner: self.external.iter(),
        }
    }
}

impl PartialEq for ZoneIndex {
    fn eq(&self, other: &Self) -> bool {
        self.external == other.external
    }
}

impl Eq for ZoneIndex {}

impl<'a> IntoIterator for &'a ZoneIndex {
    type Item = i32;
    type IntoIter = ZoneIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the zone numbers of a [`ZoneIndex`]
#[derive(Debug, Clone)]
pub struct ZoneIter<'a> {
    inner: core::slice::Iter<'a, i32>,
}

impl Iterator for ZoneIter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ZoneIter<'_> {}

impl DoubleEndedIterator for ZoneIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().copied()
    }
}
