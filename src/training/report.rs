//! Per-episode summaries and the end-of-training report.

use crate::neat::{Genome, StatisticsReporter};
use serde::Serialize;

/// How one generation's episode went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub generation: u32,
    pub population: usize,
    /// Pipes passed.
    pub score: u32,
    pub ticks: u64,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    /// Stopped by the tick limit with birds still alive.
    pub timed_out: bool,
    /// Stopped by the quit signal.
    pub quit: bool,
}

/// Aggregated results of a training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub generations_run: usize,
    pub best_score: u32,
    pub best_fitness: f64,
    pub total_ticks: u64,
    pub stopped_by_user: bool,
    pub winner_key: Option<u64>,
    /// (nodes, enabled connections)
    pub winner_size: Option<(usize, usize)>,
    pub fitness_means: Vec<f64>,
    pub fitness_stdevs: Vec<f64>,
    pub episodes: Vec<EpisodeSummary>,
}

impl TrainingReport {
    pub fn new(
        episodes: Vec<EpisodeSummary>,
        stats: &StatisticsReporter,
        winner: Option<&Genome>,
    ) -> Self {
        Self {
            generations_run: episodes.len(),
            best_score: episodes.iter().map(|e| e.score).max().unwrap_or(0),
            best_fitness: episodes
                .iter()
                .map(|e| e.best_fitness)
                .fold(0.0, f64::max),
            total_ticks: episodes.iter().map(|e| e.ticks).sum(),
            stopped_by_user: episodes.iter().any(|e| e.quit),
            winner_key: winner.map(|g| g.key),
            winner_size: winner.map(Genome::size),
            fitness_means: stats.fitness_means(),
            fitness_stdevs: stats.fitness_stdevs(),
            episodes,
        }
    }

    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    NEAT TRAINING REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Generations: {}{}\n",
            self.generations_run,
            if self.stopped_by_user {
                " (stopped by user)"
            } else {
                ""
            }
        ));
        report.push_str(&format!("Best score:   {}\n", self.best_score));
        report.push_str(&format!("Best fitness: {:.1}\n", self.best_fitness));
        report.push_str(&format!("Total ticks:  {}\n", self.total_ticks));
        match (self.winner_key, self.winner_size) {
            (Some(key), Some((nodes, conns))) => report.push_str(&format!(
                "Winner:       genome {key} ({nodes} nodes, {conns} enabled connections)\n"
            )),
            _ => report.push_str("Winner:       none\n"),
        }

        report.push_str("\n── GENERATIONS ──────────────────────────────────────────────────\n");
        report.push_str("  Gen  Score   Ticks      Best      Mean\n");
        for e in &self.episodes {
            let flag = if e.quit {
                "  quit"
            } else if e.timed_out {
                "  tick limit"
            } else {
                ""
            };
            report.push_str(&format!(
                "  {:>3}  {:>5}  {:>6}  {:>8.1}  {:>8.2}{flag}\n",
                e.generation, e.score, e.ticks, e.best_fitness, e.mean_fitness
            ));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(generation: u32, score: u32, best: f64) -> EpisodeSummary {
        EpisodeSummary {
            generation,
            population: 50,
            score,
            ticks: 100 * generation as u64,
            best_fitness: best,
            mean_fitness: best / 2.0,
            timed_out: false,
            quit: false,
        }
    }

    #[test]
    fn test_aggregates() {
        let stats = StatisticsReporter::new();
        let mut genome = Genome::empty(7);
        genome.fitness = Some(30.0);
        let report = TrainingReport::new(
            vec![summary(1, 0, 4.5), summary(2, 3, 30.0), summary(3, 1, 12.0)],
            &stats,
            Some(&genome),
        );
        assert_eq!(report.generations_run, 3);
        assert_eq!(report.best_score, 3);
        assert_eq!(report.best_fitness, 30.0);
        assert_eq!(report.total_ticks, 600);
        assert_eq!(report.winner_key, Some(7));
        assert!(!report.stopped_by_user);
    }

    #[test]
    fn test_text_and_json() {
        let stats = StatisticsReporter::new();
        let mut last = summary(2, 5, 40.0);
        last.quit = true;
        let report = TrainingReport::new(vec![summary(1, 0, 3.0), last], &stats, None);

        let text = report.to_text();
        assert!(text.contains("NEAT TRAINING REPORT"));
        assert!(text.contains("(stopped by user)"));
        assert!(text.contains("Winner:       none"));
        assert!(text.contains("quit"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["best_score"], 5);
        assert_eq!(json["episodes"].as_array().map(Vec::len), Some(2));
    }
}
