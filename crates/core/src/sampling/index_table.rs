use crate::config::WindowDepth;
use crate::sampling::slice::SampleSlice;
use crate::shared::error::DatasetError;

/// Location of one sample: which source, and the window start inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleIndex {
    pub source: usize,
    pub offset: usize,
}

/// Flat, order-stable mapping from a global sample index to its
/// `(source, offset)` location.
///
/// Entries are laid out source by source, offsets ascending within each
/// source. The table is built once and never changes, so it can be shared
/// between readers without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    entries: Vec<SampleIndex>,
    samples_per_source: Vec<usize>,
    first_sample: Vec<usize>,
}

impl IndexTable {
    /// Builds the table for sources with the given frame counts.
    ///
    /// Every count must be at least 1; a source shorter than the window
    /// still contributes a single (short) sample.
    pub fn build(frame_counts: &[usize], window: WindowDepth) -> Self {
        let samples_per_source: Vec<usize> = frame_counts
            .iter()
            .map(|&count| Self::samples_for(count, window))
            .collect();

        let mut first_sample = Vec::with_capacity(samples_per_source.len());
        let mut entries = Vec::with_capacity(samples_per_source.iter().sum());
        for (source, &n) in samples_per_source.iter().enumerate() {
            first_sample.push(entries.len());
            entries.extend((0..n).map(|offset| SampleIndex { source, offset }));
        }

        Self {
            entries,
            samples_per_source,
            first_sample,
        }
    }

    /// Number of windows a source of `frame_count` frames contributes.
    pub fn samples_for(frame_count: usize, window: WindowDepth) -> usize {
        let depth = window.bound();
        if frame_count < depth {
            1
        } else {
            frame_count - depth + 1
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SampleIndex> {
        self.entries.get(index).copied()
    }

    pub fn resolve(&self, index: usize) -> Result<SampleIndex, DatasetError> {
        self.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Locations selected by `slice`, in selection order.
    pub fn resolve_slice(&self, slice: &SampleSlice) -> Result<Vec<SampleIndex>, DatasetError> {
        Ok(slice
            .indices(self.len())?
            .into_iter()
            .map(|i| self.entries[i])
            .collect())
    }

    /// Inverse of [`IndexTable::resolve`].
    pub fn flat_index(&self, location: SampleIndex) -> Option<usize> {
        let n = *self.samples_per_source.get(location.source)?;
        (location.offset < n).then(|| self.first_sample[location.source] + location.offset)
    }

    pub fn samples_per_source(&self) -> &[usize] {
        &self.samples_per_source
    }

    pub fn entries(&self) -> &[SampleIndex] {
        &self.entries
    }
}
