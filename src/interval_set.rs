// Already-reserved date ranges for one vehicle, and the overlap validator run against them

use crate::date::{DateOnly, Interval};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Range {candidate} intersects existing reservation {conflict}")]
pub struct OverlapError {
    pub candidate: Interval,
    pub conflict: Interval,
}

// Read-only once loaded; the backend stays the authority on what is booked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new(mut intervals: Vec<Interval>) -> Self {
        intervals.sort_by_key(|interval| (interval.start(), interval.end()));
        Self { intervals }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn contains_day(&self, day: DateOnly) -> bool {
        self.intervals.iter().any(|interval| interval.contains(day))
    }

    pub fn first_conflict(&self, candidate: &Interval) -> Option<&Interval> {
        self.intervals
            .iter()
            .find(|interval| interval.overlaps(candidate))
    }

    pub fn overlaps(&self, candidate: &Interval) -> bool {
        self.first_conflict(candidate).is_some()
    }

    pub fn check(&self, candidate: &Interval) -> Result<(), OverlapError> {
        match self.first_conflict(candidate) {
            Some(conflict) => Err(OverlapError {
                candidate: *candidate,
                conflict: *conflict,
            }),
            None => Ok(()),
        }
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// Pure, total overlap test of a candidate against every reserved interval.
pub fn overlaps(candidate: &Interval, interval_set: &IntervalSet) -> bool {
    interval_set.overlaps(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::day;

    fn reserved() -> IntervalSet {
        IntervalSet::new(vec![
            Interval::parse("2024-07-01", "2024-07-03").unwrap(),
            Interval::parse("2024-06-10", "2024-06-12").unwrap(),
        ])
    }

    #[test]
    fn test_sorted_by_start() {
        let set = reserved();
        let starts: Vec<String> = set.iter().map(|i| i.start().to_string()).collect();
        assert_eq!(starts, vec!["2024-06-10", "2024-07-01"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_contains_day_is_inclusive() {
        let set = reserved();
        assert!(set.contains_day(day("2024-06-10")));
        assert!(set.contains_day(day("2024-06-12")));
        assert!(!set.contains_day(day("2024-06-13")));
        assert!(!set.contains_day(day("2024-06-09")));
    }

    #[test]
    fn test_candidate_inside_member_overlaps() {
        let set = reserved();
        for member in set.iter() {
            for d in member.days() {
                assert!(overlaps(&Interval::single_day(d), &set));
            }
            assert!(overlaps(member, &set));
        }
    }

    #[test]
    fn test_check_reports_first_conflict() {
        let set = reserved();
        let candidate = Interval::parse("2024-06-09", "2024-07-02").unwrap();
        let err = set.check(&candidate).unwrap_err();
        assert_eq!(err.conflict, Interval::parse("2024-06-10", "2024-06-12").unwrap());
        assert_eq!(err.candidate, candidate);

        let free = Interval::parse("2024-06-13", "2024-06-30").unwrap();
        assert!(set.check(&free).is_ok());
    }

    #[test]
    fn test_empty_set_never_overlaps() {
        let candidate = Interval::parse("2024-06-01", "2024-12-31").unwrap();
        assert!(!overlaps(&candidate, &IntervalSet::empty()));
    }
}
