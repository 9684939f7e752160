use std::fmt;
use std::str::FromStr;

use crate::task::{Difficulty, Task};

/// Difficulty filter applied to the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Difficulty),
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(difficulty) => task.difficulty == difficulty,
        }
    }

    /// All -> Low -> High -> All
    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Only(Difficulty::Low),
            Filter::Only(Difficulty::Low) => Filter::Only(Difficulty::High),
            Filter::Only(Difficulty::High) => Filter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(difficulty) => difficulty.as_str(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Filter::All);
        }
        Difficulty::parse(s)
            .map(Filter::Only)
            .ok_or_else(|| format!("unknown filter '{}' (expected all, Low or High)", s))
    }
}
