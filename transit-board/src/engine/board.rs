//! One tick of the departure pipeline.

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::classify::classify;
use super::config::EngineConfig;
use super::expand::expand_schedule;
use super::rank::rank_departures;
use crate::domain::{Departure, DepartureKey, LineSchedule};

/// Ranked departures of every line at one instant.
#[derive(Debug, Clone)]
pub struct Board {
    pub generated_at: NaiveDateTime,
    pub departures: Vec<Departure>,
}

impl Board {
    /// Classify already-expanded instants and rank the result.
    ///
    /// Lines are taken in iteration order; their instants must be in
    /// chronological order for ties to stay stable.
    pub fn assemble<'a, I>(lines: I, now: NaiveDateTime, config: &EngineConfig) -> Self
    where
        I: IntoIterator<Item = (&'a Arc<LineSchedule>, &'a [NaiveDateTime])>,
    {
        let departures = lines
            .into_iter()
            .flat_map(|(line, instants)| classify(line, instants, now, config))
            .collect();

        Self {
            generated_at: now,
            departures: rank_departures(departures),
        }
    }

    /// Look up a departure by its stable key.
    ///
    /// Returns `None` when the departure is not on this board, e.g. the
    /// schedule changed since it was selected.
    pub fn find(&self, key: &DepartureKey) -> Option<&Departure> {
        self.departures
            .iter()
            .find(|d| d.line.id == key.line_id && d.window.scheduled == key.scheduled)
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }
}

/// Run expand, classify and rank for all lines at `now`.
///
/// Departures are anchored on the date of `now`.
pub fn build_board(lines: &[Arc<LineSchedule>], now: NaiveDateTime, config: &EngineConfig) -> Board {
    let date = now.date();
    let expanded: Vec<Vec<NaiveDateTime>> = lines
        .iter()
        .map(|line| expand_schedule(line, date, config.bucket_scheme))
        .collect();

    Board::assemble(
        lines.iter().zip(expanded.iter().map(Vec::as_slice)),
        now,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineId, Phase};
    use crate::engine::progress_at;
    use chrono::NaiveDate;

    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn line(id: &str, weekday: &[&str]) -> Arc<LineSchedule> {
        Arc::new(LineSchedule {
            id: LineId::new(id),
            line_name: format!("Linha {id}"),
            line_code: id.to_string(),
            point_a: "Terminal".to_string(),
            point_b: "Centro".to_string(),
            phone: None,
            times_weekday: weekday.iter().map(|s| s.to_string()).collect(),
            times_saturday: vec![],
            times_sunday: vec![],
        })
    }

    fn phase_of(board: &Board, id: &str, h: u32, m: u32) -> Option<Phase> {
        let key = DepartureKey {
            line_id: LineId::new(id),
            scheduled: monday_at(h, m),
        };
        board.find(&key).map(|d| d.phase)
    }

    #[test]
    fn finished_and_approaching_at_six_fifty() {
        let lines = [line("1", &["06:00", "07:30"])];
        let board = build_board(&lines, monday_at(6, 50), &EngineConfig::default());

        assert_eq!(phase_of(&board, "1", 6, 0), Some(Phase::Finished));
        assert_eq!(phase_of(&board, "1", 7, 30), Some(Phase::Approaching));
        // Approaching ranks before finished
        assert_eq!(board.departures[0].phase, Phase::Approaching);
    }

    #[test]
    fn in_transit_and_waiting_at_six_fifteen() {
        let lines = [line("1", &["06:00", "07:30"])];
        let now = monday_at(6, 15);
        let board = build_board(&lines, now, &EngineConfig::default());

        assert_eq!(phase_of(&board, "1", 6, 0), Some(Phase::InTransit));
        assert_eq!(phase_of(&board, "1", 7, 30), Some(Phase::Waiting));

        let first = &board.departures[0];
        let progress = progress_at(&first.window, now).value();
        assert!((progress - 33.333).abs() < 0.01);
    }

    #[test]
    fn earlier_approaching_ranks_first_across_lines() {
        // A two-hour approach window puts both runs in the approaching phase
        let mut config = EngineConfig::default();
        config.approach_mins = 120;
        let lines = [line("late", &["08:00"]), line("early", &["07:00"])];
        let board = build_board(&lines, monday_at(6, 30), &config);

        assert_eq!(board.len(), 2);
        assert!(board.departures.iter().all(|d| d.phase == Phase::Approaching));
        assert_eq!(board.departures[0].line.id.as_str(), "early");
        assert_eq!(board.departures[1].line.id.as_str(), "late");
    }

    #[test]
    fn short_form_time_is_rejected() {
        let lines = [line("1", &["6:0", "08:00"])];
        let board = build_board(&lines, monday_at(5, 0), &EngineConfig::default());

        assert_eq!(board.len(), 1);
        assert_eq!(board.departures[0].scheduled(), monday_at(8, 0));
    }

    #[test]
    fn sentinel_entry_yields_nothing() {
        let lines = [line("1", &["não operacional"]), line("2", &["09:00"])];
        let board = build_board(&lines, monday_at(5, 0), &EngineConfig::default());

        assert_eq!(board.len(), 1);
        assert_eq!(board.departures[0].line.id.as_str(), "2");
    }

    #[test]
    fn no_lines_give_empty_board() {
        let board = build_board(&[], monday_at(5, 0), &EngineConfig::default());
        assert!(board.is_empty());
        assert_eq!(board.generated_at, monday_at(5, 0));
    }

    #[test]
    fn stale_key_is_absent() {
        let lines = [line("1", &["06:00"])];
        let board = build_board(&lines, monday_at(5, 0), &EngineConfig::default());

        assert!(phase_of(&board, "1", 6, 1).is_none());
        assert!(phase_of(&board, "2", 6, 0).is_none());
    }

    #[test]
    fn ties_follow_line_order() {
        let lines = [line("b", &["07:00"]), line("a", &["07:00"]), line("c", &["07:00"])];
        let board = build_board(&lines, monday_at(4, 0), &EngineConfig::default());

        let ids: Vec<&str> = board.departures.iter().map(|d| d.line.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn oversized_unchecked_travel_does_not_panic() {
        let mut config = EngineConfig::default();
        config.travel_mins = 1_000_000_000_000;
        let lines = [line("1", &["06:00"])];

        let board = build_board(&lines, monday_at(5, 0), &config);
        assert_eq!(board.departures[0].phase, Phase::Approaching);

        let board = build_board(&lines, monday_at(7, 0), &config);
        assert_eq!(board.departures[0].phase, Phase::InTransit);
        assert!(progress_at(&board.departures[0].window, monday_at(7, 0)).is_visible());
    }

    #[test]
    fn weekend_uses_weekend_lists() {
        let mut schedule = (*line("1", &["06:00"])).clone();
        schedule.times_sunday = vec!["10:00".to_string()];
        let lines = [Arc::new(schedule)];
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 24)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();

        let board = build_board(&lines, sunday, &EngineConfig::default());
        assert_eq!(board.len(), 1);
        assert_eq!(board.departures[0].scheduled().format("%H:%M").to_string(), "10:00");
    }
}
