use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Serialize;

use crate::mass::MassTable;
use crate::peptide::Peptide;
use crate::scoring::Scorer;
use crate::spectrum::Spectrum;
use crate::Error;

/// Bounded-width branch-and-bound over cyclic peptide candidates.
///
/// Each round expands every leaderboard peptide by every residue mass,
/// scores complete candidates (total mass equal to the parent mass) by
/// cyclic consistency, and trims the rest to the `limit` best by linear
/// consistency, keeping ties at the cutoff rank. The search ends when no
/// candidate remains below the parent mass.
pub struct LeaderboardSearch<'t> {
    pub table: &'t MassTable,
    /// Leaderboard width. Candidates ranked below this survive a round only
    /// when tied with the candidate at the cutoff rank.
    pub limit: usize,
}

/// The best complete candidate found by a search, with its cyclic
/// consistency score. An empty peptide at score 0 means no candidate
/// reached the parent mass with any matching peaks; that is a legitimate
/// outcome, not an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Leader {
    pub peptide: Peptide,
    pub score: u32,
}

const ROOT: NodeIx = NodeIx(0);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeIx(u32);

#[derive(Copy, Clone, Debug)]
struct Node {
    parent: NodeIx,
    mass: u32,
    total: u32,
}

/// Search-private store of every expanded candidate. Appending a residue is
/// one node push, and candidates share their prefixes instead of carrying
/// independent copies of the mass sequence; full sequences are materialized
/// only for scoring and for the final leader.
struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: ROOT,
                mass: 0,
                total: 0,
            }],
        }
    }

    fn push(&mut self, parent: NodeIx, mass: u32) -> NodeIx {
        let total = self.total(parent).saturating_add(mass);
        self.nodes.push(Node {
            parent,
            mass,
            total,
        });
        NodeIx(self.nodes.len() as u32 - 1)
    }

    fn total(&self, ix: NodeIx) -> u32 {
        self.nodes[ix.0 as usize].total
    }

    /// Walk back to the root and materialize the mass sequence
    fn peptide(&self, ix: NodeIx) -> Peptide {
        let mut masses = Vec::new();
        let mut cursor = ix;
        while cursor != ROOT {
            let node = self.nodes[cursor.0 as usize];
            masses.push(node.mass);
            cursor = node.parent;
        }
        masses.reverse();
        Peptide::new(masses)
    }
}

/// Outcome of matching one expanded candidate against the parent mass
enum Fate {
    /// Total mass equals the parent mass; holds the cyclic consistency score
    Complete(u32),
    /// Total mass is still below the parent mass; holds the linear
    /// consistency score used for trimming
    Survivor(u32),
    /// Total mass overshot the parent mass and can never return
    Overshoot,
}

struct Scored {
    node: NodeIx,
    score: u32,
}

impl<'t> LeaderboardSearch<'t> {
    pub fn new(table: &'t MassTable, limit: usize) -> Self {
        Self { table, limit }
    }

    pub fn run(&self, experimental: &Spectrum) -> Result<Leader, Error> {
        let parent_mass = experimental.parent_mass().ok_or(Error::EmptySpectrum)?;
        let residue_masses = self.table.residue_masses();
        if residue_masses.is_empty() {
            log::warn!("mass table has no residues; search cannot expand");
        }
        let scorer = Scorer::new(experimental);

        let mut arena = Arena::new();
        let mut leader = Leader::default();
        let mut leaderboard = vec![ROOT];
        let mut round = 0usize;

        while !leaderboard.is_empty() {
            round += 1;

            // Expansion order is (leaderboard index, ascending residue mass);
            // every later step preserves it, so equal-scoring candidates
            // resolve identically on every run and thread count.
            let mut candidates = Vec::with_capacity(leaderboard.len() * residue_masses.len());
            for &parent in &leaderboard {
                for &mass in &residue_masses {
                    candidates.push(arena.push(parent, mass));
                }
            }

            // Classify and score candidates in parallel; collect is the
            // round barrier demanded by the trim step.
            let fates: Vec<Fate> = candidates
                .par_iter()
                .map(|&ix| match arena.total(ix).cmp(&parent_mass) {
                    Ordering::Equal => Fate::Complete(scorer.cyclic(&arena.peptide(ix))),
                    Ordering::Less => Fate::Survivor(scorer.linear(&arena.peptide(ix))),
                    Ordering::Greater => Fate::Overshoot,
                })
                .collect();

            // Fold sequentially in expansion order: on a tied cyclic score
            // the earlier candidate keeps the lead.
            let mut survivors = Vec::new();
            for (&node, fate) in candidates.iter().zip(&fates) {
                match *fate {
                    Fate::Complete(score) if score > leader.score => {
                        leader = Leader {
                            peptide: arena.peptide(node),
                            score,
                        };
                    }
                    Fate::Complete(_) | Fate::Overshoot => {}
                    Fate::Survivor(score) => survivors.push(Scored { node, score }),
                }
            }

            trim(&mut survivors, self.limit);
            log::trace!(
                "round {}: {} candidates, {} retained, leader score {}",
                round,
                candidates.len(),
                survivors.len(),
                leader.score
            );
            leaderboard = survivors.into_iter().map(|scored| scored.node).collect();
        }

        Ok(leader)
    }
}

/// Keep the `limit` best-scoring survivors plus every survivor tied with the
/// score at the cutoff rank, preserving expansion order.
fn trim(survivors: &mut Vec<Scored>, limit: usize) {
    if survivors.len() <= limit {
        return;
    }
    if limit == 0 {
        survivors.clear();
        return;
    }
    let mut scores: Vec<u32> = survivors.iter().map(|scored| scored.score).collect();
    let (_, &mut cutoff, _) = scores.select_nth_unstable_by(limit - 1, |a, b| b.cmp(a));
    survivors.retain(|scored| scored.score >= cutoff);
}

#[cfg(test)]
mod tests {
    use super::{trim, Arena, LeaderboardSearch, NodeIx, Scored, ROOT};
    use crate::mass::MassTable;
    use crate::spectrum::Spectrum;
    use crate::Error;

    fn scored(scores: &[u32]) -> Vec<Scored> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| Scored {
                node: NodeIx(i as u32),
                score,
            })
            .collect()
    }

    fn scores(survivors: &[Scored]) -> Vec<u32> {
        survivors.iter().map(|scored| scored.score).collect()
    }

    #[test]
    fn arena_materializes_paths() {
        let mut arena = Arena::new();
        let g = arena.push(ROOT, 57);
        let ga = arena.push(g, 71);
        let gg = arena.push(g, 57);
        assert_eq!(arena.peptide(ga).masses(), [57, 71]);
        assert_eq!(arena.peptide(gg).masses(), [57, 57]);
        assert_eq!(arena.total(ga), 128);
        assert_eq!(arena.peptide(ROOT).masses(), [0u32; 0]);
    }

    #[test]
    fn trim_keeps_ties_at_the_cutoff() {
        let mut survivors = scored(&[5, 3, 3, 3, 1]);
        trim(&mut survivors, 2);
        assert_eq!(scores(&survivors), vec![5, 3, 3, 3]);
    }

    #[test]
    fn trim_without_ties() {
        let mut survivors = scored(&[2, 5, 4, 3, 1]);
        trim(&mut survivors, 2);
        assert_eq!(scores(&survivors), vec![5, 4]);
    }

    #[test]
    fn trim_preserves_expansion_order() {
        // cutoff rank 3 (limit 3) carries score 3, so the late 3 survives
        // and the retained set keeps its original relative order
        let mut survivors = scored(&[3, 1, 4, 2, 4]);
        trim(&mut survivors, 3);
        assert_eq!(scores(&survivors), vec![3, 4, 4]);
    }

    #[test]
    fn trim_below_limit_is_a_no_op() {
        let mut survivors = scored(&[1, 2]);
        trim(&mut survivors, 5);
        assert_eq!(scores(&survivors), vec![1, 2]);
    }

    #[test]
    fn trim_to_zero_clears() {
        let mut survivors = scored(&[1, 2]);
        trim(&mut survivors, 0);
        assert!(survivors.is_empty());
    }

    #[test]
    fn empty_spectrum_is_rejected() {
        let table = MassTable::default();
        let search = LeaderboardSearch::new(&table, 5);
        assert_eq!(
            search.run(&Spectrum::default()).err(),
            Some(Error::EmptySpectrum)
        );
    }

    #[test]
    fn first_complete_candidate_wins_ties() {
        // (57, 71) and (71, 57) both reach the parent mass with cyclic
        // score 4; ascending expansion order finds (57, 71) first and the
        // strict improvement rule keeps it.
        let table = MassTable::new([(b'G', 57), (b'A', 71)]);
        let experimental = Spectrum::from_masses([0, 57, 71, 128, 128]);
        let leader = LeaderboardSearch::new(&table, 2)
            .run(&experimental)
            .unwrap();
        assert_eq!(leader.peptide.masses(), [57, 71]);
        assert_eq!(leader.score, 4);
    }

    #[test]
    fn unreachable_parent_mass_yields_the_empty_leader() {
        let table = MassTable::new([(b'G', 57)]);
        let experimental = Spectrum::from_masses([0, 100]);
        let leader = LeaderboardSearch::new(&table, 5)
            .run(&experimental)
            .unwrap();
        assert!(leader.peptide.is_empty());
        assert_eq!(leader.score, 0);
    }
}
