//! Year-scoped ranking of team ratings and the chart series behind it.

use serde::Serialize;

/// A rating row joined with the team's badge path, as read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub team_name: String,
    pub year: i32,
    pub points: f64,
    pub badge: Option<String>,
}

/// One row of the ranked leaderboard table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRating {
    pub rank: i32,
    pub team_name: String,
    pub year: i32,
    pub points: f64,
    pub badge: Option<String>,
}

/// A single bar of the ratings chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub team_name: String,
    pub points: f64,
}

/// The most recent year any rating was recorded for, used as the default
/// selection. `None` when no ratings exist yet.
#[must_use]
pub fn latest_year(rows: &[RatingRow]) -> Option<i32> {
    rows.iter().map(|r| r.year).max()
}

/// All years with at least one rating, newest first.
#[must_use]
pub fn distinct_years(rows: &[RatingRow]) -> Vec<i32> {
    let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Filters to one year, orders by points descending (team name ascending on
/// ties) and assigns ranks 1..N in that order.
#[must_use]
pub fn table_for_year(rows: &[RatingRow], year: i32) -> Vec<RankedRating> {
    let mut selected: Vec<&RatingRow> = rows.iter().filter(|r| r.year == year).collect();
    selected.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });

    selected
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankedRating {
            rank: i32::try_from(i).unwrap_or(i32::MAX - 1) + 1,
            team_name: r.team_name.clone(),
            year: r.year,
            points: r.points,
            badge: r.badge.clone(),
        })
        .collect()
}

/// The bar-chart series backing a ranked table.
#[must_use]
pub fn chart_series(table: &[RankedRating]) -> Vec<ChartPoint> {
    table
        .iter()
        .map(|r| ChartPoint {
            team_name: r.team_name.clone(),
            points: r.points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(team: &str, year: i32, points: f64) -> RatingRow {
        RatingRow {
            team_name: team.to_string(),
            year,
            points,
            badge: None,
        }
    }

    #[test]
    fn ranks_selected_year_by_points() {
        let rows = vec![row("X", 2024, 8.5), row("Y", 2024, 6.5), row("X", 2023, 5.0)];

        let table = table_for_year(&rows, 2024);
        assert_eq!(table.len(), 2);
        assert_eq!((table[0].rank, table[0].team_name.as_str()), (1, "X"));
        assert_eq!((table[1].rank, table[1].team_name.as_str()), (2, "Y"));
    }

    #[test]
    fn default_year_is_the_latest() {
        let rows = vec![row("X", 2024, 8.5), row("Y", 2024, 6.5), row("X", 2023, 5.0)];
        assert_eq!(latest_year(&rows), Some(2024));
    }

    #[test]
    fn empty_ratings_yield_empty_everything() {
        let rows: Vec<RatingRow> = Vec::new();
        assert_eq!(latest_year(&rows), None);
        assert!(distinct_years(&rows).is_empty());
        assert!(table_for_year(&rows, 2024).is_empty());
    }

    #[test]
    fn years_are_distinct_and_newest_first() {
        let rows = vec![
            row("X", 2023, 1.0),
            row("Y", 2025, 2.0),
            row("Z", 2023, 3.0),
            row("W", 2024, 4.0),
        ];
        assert_eq!(distinct_years(&rows), vec![2025, 2024, 2023]);
    }

    #[test]
    fn tied_points_rank_by_team_name() {
        let rows = vec![row("Beta", 2025, 4.0), row("Alpha", 2025, 4.0)];

        let table = table_for_year(&rows, 2025);
        assert_eq!((table[0].rank, table[0].team_name.as_str()), (1, "Alpha"));
        assert_eq!((table[1].rank, table[1].team_name.as_str()), (2, "Beta"));
    }

    #[test]
    fn chart_mirrors_the_table_order() {
        let rows = vec![row("X", 2024, 8.5), row("Y", 2024, 6.5)];
        let table = table_for_year(&rows, 2024);
        let chart = chart_series(&table);

        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].team_name, "X");
        assert!((chart[0].points - 8.5).abs() < f64::EPSILON);
        assert_eq!(chart[1].team_name, "Y");
    }
}
