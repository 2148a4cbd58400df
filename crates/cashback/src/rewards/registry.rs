use super::catalog::standard_programs;
use super::program::RewardProgram;
use std::collections::HashSet;

/// Fixed, ordered collection of reward programs.
///
/// Iteration order is the order programs were registered in and is what the
/// optimizer uses to break ties.
#[derive(Debug, Clone)]
pub struct RewardProgramRegistry {
    programs: Vec<RewardProgram>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("reward program `{0}` registered more than once")]
    DuplicateProgram(String),
    #[error("reward program registry must contain at least one program")]
    Empty,
}

impl RewardProgramRegistry {
    pub fn new(programs: Vec<RewardProgram>) -> Result<Self, RegistryError> {
        if programs.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for program in &programs {
            if !seen.insert(program.name.as_str()) {
                return Err(RegistryError::DuplicateProgram(program.name.clone()));
            }
        }

        Ok(Self { programs })
    }

    /// The cards this engine knows how to price.
    pub fn standard() -> Self {
        Self {
            programs: standard_programs(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RewardProgram> {
        self.programs.iter().find(|program| program.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RewardProgram> {
        self.programs.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.programs.iter().map(|program| program.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl Default for RewardProgramRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a RewardProgramRegistry {
    type Item = &'a RewardProgram;
    type IntoIter = std::slice::Iter<'a, RewardProgram>;

    fn into_iter(self) -> Self::IntoIter {
        self.programs.iter()
    }
}
