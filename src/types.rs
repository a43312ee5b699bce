use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Problem number as printed on the judge's profile page.
pub type ProblemId = i64;

/// Problem ids scraped from one profile, each list in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub solved: Vec<ProblemId>,
    pub wrong: Vec<ProblemId>,
}

impl ScrapeResult {
    pub fn new(solved: Vec<ProblemId>, wrong: Vec<ProblemId>) -> Self {
        Self { solved, wrong }
    }

    pub fn is_empty(&self) -> bool {
        self.solved.is_empty() && self.wrong.is_empty()
    }

    pub fn stats(&self) -> ScrapeStats {
        ScrapeStats::from_result(self)
    }
}

impl Display for ScrapeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solved: {}", join_ids(&self.solved))?;
        write!(f, "Wrong:  {}", join_ids(&self.wrong))
    }
}

fn join_ids(ids: &[ProblemId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(ProblemId::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, PartialEq, Eq)]
pub struct ScrapeStats {
    pub solved: usize,
    pub wrong: usize,
    pub total: usize,
}

impl ScrapeStats {
    pub fn from_result(result: &ScrapeResult) -> ScrapeStats {
        ScrapeStats {
            solved: result.solved.len(),
            wrong: result.wrong.len(),
            total: result.solved.len() + result.wrong.len(),
        }
    }
}

impl Display for ScrapeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Solved:        {}", self.solved)?;
        writeln!(f, "  Wrong answers: {}", self.wrong)?;
        writeln!(f, "  Total:         {}", self.total)
    }
}
