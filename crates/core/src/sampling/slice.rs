use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::shared::error::DatasetError;

/// A `start:stop:step` selection over the flat sample sequence.
///
/// Negative bounds count from the end, out-of-range bounds are clamped,
/// and a negative step walks backwards. Only a zero step is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleSlice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SampleSlice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    pub fn full() -> Self {
        Self::default()
    }

    /// Positions selected from a sequence of length `len`, in selection order.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, DatasetError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(DatasetError::ZeroSliceStep);
        }
        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = self
            .start
            .map(clamp)
            .unwrap_or(if step > 0 { lower } else { upper });
        let stop = self
            .stop
            .map(clamp)
            .unwrap_or(if step > 0 { upper } else { lower });

        let mut indices = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(indices)
    }
}

impl From<Range<usize>> for SampleSlice {
    fn from(range: Range<usize>) -> Self {
        Self::new(
            Some(range.start as isize),
            Some(range.end as isize),
            None,
        )
    }
}

impl fmt::Display for SampleSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |v: Option<isize>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "{}:{}", part(self.start), part(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{step}")?;
        }
        Ok(())
    }
}

impl FromStr for SampleSlice {
    type Err = String;

    /// Parses `start:stop[:step]`, where every part may be empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(format!("expected start:stop[:step], got '{s}'"));
        }
        let parse = |p: &str| -> Result<Option<isize>, String> {
            let p = p.trim();
            if p.is_empty() {
                Ok(None)
            } else {
                p.parse()
                    .map(Some)
                    .map_err(|_| format!("invalid slice bound '{p}' in '{s}'"))
            }
        };
        Ok(Self::new(
            parse(parts[0])?,
            parse(parts[1])?,
            parts.get(2).copied().map(parse).transpose()?.flatten(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::full(SampleSlice::full(), vec![0, 1, 2, 3, 4])]
    #[case::middle(SampleSlice::new(Some(2), Some(5), None), vec![2, 3, 4])]
    #[case::stop_clamped(SampleSlice::new(Some(3), Some(100), None), vec![3, 4])]
    #[case::start_past_end(SampleSlice::new(Some(9), None, None), vec![])]
    #[case::negative_start(SampleSlice::new(Some(-2), None, None), vec![3, 4])]
    #[case::negative_stop(SampleSlice::new(None, Some(-3), None), vec![0, 1])]
    #[case::very_negative(SampleSlice::new(Some(-99), Some(2), None), vec![0, 1])]
    #[case::stepped(SampleSlice::new(None, None, Some(2)), vec![0, 2, 4])]
    #[case::reversed(SampleSlice::new(None, None, Some(-1)), vec![4, 3, 2, 1, 0])]
    #[case::reversed_bounded(SampleSlice::new(Some(3), Some(0), Some(-2)), vec![3, 1])]
    #[case::empty_range(SampleSlice::new(Some(3), Some(1), None), vec![])]
    #[case::max_step(SampleSlice::new(Some(1), None, Some(isize::MAX)), vec![1])]
    #[case::min_step(SampleSlice::new(Some(3), None, Some(isize::MIN)), vec![3])]
    fn test_indices(#[case] slice: SampleSlice, #[case] expected: Vec<usize>) {
        assert_eq!(slice.indices(5).unwrap(), expected);
    }

    #[test]
    fn test_zero_step_rejected() {
        let slice = SampleSlice::new(None, None, Some(0));
        assert!(matches!(slice.indices(5), Err(DatasetError::ZeroSliceStep)));
    }

    #[test]
    fn test_empty_sequence() {
        assert!(SampleSlice::full().indices(0).unwrap().is_empty());
        assert!(SampleSlice::new(None, None, Some(-1)).indices(0).unwrap().is_empty());
    }

    #[test]
    fn test_from_range() {
        assert_eq!(SampleSlice::from(2..5).indices(10).unwrap(), vec![2, 3, 4]);
    }

    #[rstest]
    #[case::bounded("2:5", SampleSlice::new(Some(2), Some(5), None))]
    #[case::open_end("-3:", SampleSlice::new(Some(-3), None, None))]
    #[case::step_only("::2", SampleSlice::new(None, None, Some(2)))]
    #[case::all(":", SampleSlice::full())]
    fn test_parse(#[case] text: &str, #[case] expected: SampleSlice) {
        assert_eq!(text.parse::<SampleSlice>().unwrap(), expected);
    }

    #[rstest]
    #[case::no_colon("5")]
    #[case::too_many("1:2:3:4")]
    #[case::not_a_number("a:3")]
    fn test_parse_errors(#[case] text: &str) {
        assert!(text.parse::<SampleSlice>().is_err());
    }

    #[test]
    fn test_parsed_huge_step_selects_start_only() {
        let slice: SampleSlice = "1::9223372036854775807".parse().unwrap();
        assert_eq!(slice.indices(5).unwrap(), vec![1]);
    }

    #[test]
    fn test_display_round_trips() {
        let slice = SampleSlice::new(Some(-3), None, Some(2));
        assert_eq!(slice.to_string(), "-3::2");
        assert_eq!(slice.to_string().parse::<SampleSlice>().unwrap(), slice);
    }
}
