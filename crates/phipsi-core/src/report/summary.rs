use crate::engine::secondary::{SecondaryStructure, SecondaryStructureAssignment};
use std::fmt;

/// Occurrence counts of every secondary-structure label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecondaryStructureSummary {
    counts: [usize; SecondaryStructure::ALL.len()],
}

impl SecondaryStructureSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignment(assignment: &SecondaryStructureAssignment) -> Self {
        assignment.labels().collect()
    }

    pub fn add(&mut self, label: SecondaryStructure) {
        self.counts[label as usize] += 1;
    }

    /// Adds every label of `assignment`; used to summarize several segments together.
    pub fn add_assignment(&mut self, assignment: &SecondaryStructureAssignment) {
        assignment.labels().for_each(|label| self.add(label));
    }

    pub fn count(&self, label: SecondaryStructure) -> usize {
        self.counts[label as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs in reporting order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (SecondaryStructure, usize)> + '_ {
        SecondaryStructure::ALL
            .into_iter()
            .map(|label| (label, self.count(label)))
    }
}

impl FromIterator<SecondaryStructure> for SecondaryStructureSummary {
    fn from_iter<I: IntoIterator<Item = SecondaryStructure>>(iter: I) -> Self {
        let mut summary = Self::new();
        iter.into_iter().for_each(|label| summary.add(label));
        summary
    }
}

impl fmt::Display for SecondaryStructureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Secondary Structure Summary:")?;
        for (label, count) in self.iter() {
            writeln!(f, "{}: {}", label, count)?;
        }
        Ok(())
    }
}
