use std::time::Instant;

use cyclops_core::scoring::score_sequence;
use cyclops_core::search::LeaderboardSearch;
use log::info;
use serde::Serialize;

use crate::input::Input;

pub struct Runner {
    input: Input,
}

#[derive(Serialize)]
struct SequenceReport {
    peptide: String,
    score: u32,
}

#[derive(Serialize)]
struct ScoreReport {
    score: u32,
}

impl Runner {
    pub fn new(input: Input) -> Self {
        Self { input }
    }

    /// Run the leaderboard search and render the leader as a dash-joined
    /// mass sequence (or a JSON report).
    pub fn sequence(&self) -> anyhow::Result<String> {
        let params = self.input.sequence()?;
        let start = Instant::now();
        let leader = LeaderboardSearch::new(&self.input.table, params.limit).run(&params.spectrum)?;
        info!(
            "leaderboard search finished in {:#?} - leader score {}",
            start.elapsed(),
            leader.score
        );
        if leader.peptide.is_empty() {
            log::warn!("no candidate reached the parent mass; emitting an empty peptide");
        }

        let peptide = render_masses(leader.peptide.masses());
        if self.input.json {
            let report = SequenceReport {
                peptide,
                score: leader.score,
            };
            Ok(serde_json::to_string(&report)?)
        } else {
            Ok(peptide)
        }
    }

    /// Score the given peptide's linear spectrum against the experimental
    /// spectrum and render the score.
    pub fn score(&self) -> anyhow::Result<String> {
        let params = self.input.score()?;
        let score = score_sequence(&params.peptide, &self.input.table, &params.spectrum)?;
        if self.input.json {
            Ok(serde_json::to_string(&ScoreReport { score })?)
        } else {
            Ok(itoa::Buffer::new().format(score).to_string())
        }
    }
}

fn render_masses(masses: &[u32]) -> String {
    let mut buffer = itoa::Buffer::new();
    let mut line = String::new();
    for (i, &mass) in masses.iter().enumerate() {
        if i > 0 {
            line.push('-');
        }
        line.push_str(buffer.format(mass));
    }
    line
}

#[cfg(test)]
mod test {
    use super::render_masses;

    #[test]
    fn dash_joined() {
        assert_eq!(render_masses(&[113, 128, 71]), "113-128-71");
        assert_eq!(render_masses(&[57]), "57");
        assert_eq!(render_masses(&[]), "");
    }
}
