use crate::analyzers::types::{Direction, SortState};
use crate::records::ScoutRecord;
use std::cmp::Ordering;

/// Toggle-sorts table rows by `column`.
///
/// Requesting the column that is already active reverses the rows and flips
/// the direction. Any other column gets a fresh stable ascending sort by the
/// column's natural ordering; rows missing the column go last.
pub fn sort_table(
    mut rows: Vec<ScoutRecord>,
    column: &str,
    state: &SortState,
) -> (Vec<ScoutRecord>, SortState) {
    if state.column.as_deref() == Some(column) {
        rows.reverse();
        let direction = state.direction.unwrap_or(Direction::Ascending).flip();
        return (
            rows,
            SortState {
                column: state.column.clone(),
                direction: Some(direction),
            },
        );
    }

    rows.sort_by(|a, b| compare_column(a, b, column));

    (
        rows,
        SortState {
            column: Some(column.to_string()),
            direction: Some(Direction::Ascending),
        },
    )
}

fn compare_column(a: &ScoutRecord, b: &ScoutRecord, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(x), Some(y)) => x.natural_cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, score: Option<i64>) -> ScoutRecord {
        let r = ScoutRecord::new().with_id(id);
        match score {
            Some(s) => r.with("score", s),
            None => r,
        }
    }

    fn ids(rows: &[ScoutRecord]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.id.as_deref()).collect()
    }

    #[test]
    fn test_new_column_sorts_ascending() {
        let rows = vec![row("c", Some(3)), row("x", None), row("a", Some(1)), row("b", Some(2))];

        let (sorted, state) = sort_table(rows, "score", &SortState::default());

        assert_eq!(ids(&sorted), vec!["a", "b", "c", "x"]);
        assert_eq!(state.column.as_deref(), Some("score"));
        assert_eq!(state.direction, Some(Direction::Ascending));
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let rows = vec![row("first", Some(1)), row("zero", Some(0)), row("second", Some(1))];

        let (sorted, _) = sort_table(rows, "score", &SortState::default());

        assert_eq!(ids(&sorted), vec!["zero", "first", "second"]);
    }

    #[test]
    fn test_same_column_reverses_and_flips() {
        let rows = vec![row("b", Some(2)), row("a", Some(1)), row("c", Some(3))];

        let (asc, asc_state) = sort_table(rows, "score", &SortState::default());
        let (desc, desc_state) = sort_table(asc.clone(), "score", &asc_state);

        assert_eq!(ids(&desc), vec!["c", "b", "a"]);
        assert_eq!(desc_state.direction, Some(Direction::Descending));

        let (back, back_state) = sort_table(desc, "score", &desc_state);
        assert_eq!(back, asc);
        assert_eq!(back_state.direction, Some(Direction::Ascending));
    }

    #[test]
    fn test_switching_column_resorts() {
        let rows = vec![
            row("a", Some(2)).with("docked", true),
            row("b", Some(1)).with("docked", false),
        ];

        let (_, state) = sort_table(rows.clone(), "score", &SortState::default());
        let (by_docked, state) = sort_table(rows, "docked", &state);

        assert_eq!(ids(&by_docked), vec!["b", "a"]);
        assert_eq!(state.column.as_deref(), Some("docked"));
        assert_eq!(state.direction, Some(Direction::Ascending));
    }

    #[test]
    fn test_does_not_touch_caller_state() {
        let state = SortState::default();
        let _ = sort_table(vec![row("a", Some(1))], "score", &state);
        assert_eq!(state, SortState::default());
    }
}
