use crate::problem::{distance_matrix::NodeIdx, routing_problem::RoutingProblem};

/// Guided local search penalty counters, one per directed arc.
#[derive(Clone, Debug)]
pub struct Penalties {
    counts: Vec<u32>,
    num_nodes: usize,
}

impl Penalties {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            counts: vec![0; num_nodes * num_nodes],
            num_nodes,
        }
    }

    #[inline(always)]
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> u32 {
        self.counts[from.get() * self.num_nodes + to.get()]
    }

    pub fn increment(&mut self, from: NodeIdx, to: NodeIdx) {
        self.counts[from.get() * self.num_nodes + to.get()] += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| count as u64).sum()
    }
}

/// Arc cost seen by the local search: the matrix distance, plus
/// `lambda * penalty(arc)` while guided local search is active.
#[derive(Clone, Copy)]
pub struct ArcCosts<'a> {
    problem: &'a RoutingProblem,
    penalties: Option<(&'a Penalties, f64)>,
}

impl<'a> ArcCosts<'a> {
    pub fn distance(problem: &'a RoutingProblem) -> Self {
        Self {
            problem,
            penalties: None,
        }
    }

    pub fn augmented(problem: &'a RoutingProblem, penalties: &'a Penalties, lambda: f64) -> Self {
        Self {
            problem,
            penalties: Some((penalties, lambda)),
        }
    }

    pub fn new(problem: &'a RoutingProblem, penalties: Option<(&'a Penalties, f64)>) -> Self {
        Self { problem, penalties }
    }

    #[inline(always)]
    pub fn cost(&self, from: NodeIdx, to: NodeIdx) -> f64 {
        let distance = self.problem.distance(from, to) as f64;

        match self.penalties {
            Some((penalties, lambda)) if from != to => {
                distance + lambda * penalties.get(from, to) as f64
            }
            _ => distance,
        }
    }
}
