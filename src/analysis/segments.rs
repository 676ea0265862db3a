//! Status band segmentation
//!
//! A status column is cut into maximal runs of equal state. Each run covers the
//! time from its first sample to the first sample of the next run, and the last
//! run is closed one second after the final sample so it stays visible. At the
//! end of the representable time range the tail is dropped.

use crate::palette::normalize_state;
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeSet;

/// Length given to the final run past its last sample
pub const TAIL_SECONDS: i64 = 1;

/// One run of a constant state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Normalized state code
    pub state: String,
}

/// Cut a status column into runs.
///
/// `times` and `states` are parallel and sorted by time. States are compared
/// after [`normalize_state`].
pub fn segment_states<S: AsRef<str>>(times: &[NaiveDateTime], states: &[S]) -> Vec<StateSpan> {
    let n = times.len().min(states.len());
    let mut spans = Vec::new();
    if n == 0 {
        return spans;
    }

    let mut run_start = 0;
    for i in 1..n {
        if normalize_state(states[i].as_ref()) != normalize_state(states[run_start].as_ref()) {
            spans.push(StateSpan {
                start: times[run_start],
                end: times[i],
                state: normalize_state(states[run_start].as_ref()).to_string(),
            });
            run_start = i;
        }
    }

    let last = times[n - 1];
    spans.push(StateSpan {
        start: times[run_start],
        end: last
            .checked_add_signed(Duration::seconds(TAIL_SECONDS))
            .unwrap_or(last),
        state: normalize_state(states[run_start].as_ref()).to_string(),
    });

    spans
}

/// Sorted distinct normalized states, one legend entry each
pub fn distinct_states<S: AsRef<str>>(states: &[S]) -> Vec<String> {
    states
        .iter()
        .map(|s| normalize_state(s.as_ref()).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Legend label of a state entry
pub fn state_label(column: &str, state: &str) -> String {
    format!("{}={}", column, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn t(s: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::seconds(s)
    }

    #[test]
    fn test_empty() {
        let spans = segment_states::<&str>(&[], &[]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_single_sample() {
        let spans = segment_states(&[t(5)], &["01"]);
        assert_eq!(
            spans,
            vec![StateSpan {
                start: t(5),
                end: t(6),
                state: "01".to_string()
            }]
        );
    }

    #[test]
    fn test_runs() {
        let times: Vec<_> = (0..6).map(|s| t(s * 10)).collect();
        let states = ["00", "00", "01", "01", "'01'", "11"];
        let spans = segment_states(&times, &states);

        assert_eq!(spans.len(), 3);
        assert_eq!((spans[0].start, spans[0].end), (t(0), t(20)));
        assert_eq!(spans[0].state, "00");
        assert_eq!((spans[1].start, spans[1].end), (t(20), t(50)));
        assert_eq!(spans[1].state, "01");
        // Final single-sample run is kept
        assert_eq!((spans[2].start, spans[2].end), (t(50), t(51)));
        assert_eq!(spans[2].state, "11");
    }

    #[test]
    fn test_tail_at_end_of_time() {
        let spans = segment_states(&[NaiveDateTime::MAX], &["01"]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, NaiveDateTime::MAX);
        assert_eq!(spans[0].end, NaiveDateTime::MAX);
    }

    #[test]
    fn test_distinct_states() {
        let states = ["10", " 01", "10", "\"00\""];
        assert_eq!(distinct_states(&states), vec!["00", "01", "10"]);
        assert_eq!(state_label("p-run", "01"), "p-run=01");
    }

    proptest! {
        #[test]
        fn prop_spans_tile_the_window(codes in prop::collection::vec(0u8..3, 1..60)) {
            let times: Vec<_> = (0..codes.len() as i64).map(t).collect();
            let states: Vec<String> = codes.iter().map(|c| format!("{:02b}", c)).collect();
            let spans = segment_states(&times, &states);

            prop_assert_eq!(spans.first().unwrap().start, times[0]);
            prop_assert_eq!(spans.last().unwrap().end, *times.last().unwrap() + Duration::seconds(1));
            for pair in spans.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                prop_assert_ne!(&pair[0].state, &pair[1].state);
            }
            for span in &spans {
                prop_assert!(span.start < span.end);
            }
        }
    }
}
