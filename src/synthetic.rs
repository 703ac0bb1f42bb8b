//! Synthetic email graphs with planted departments.
//!
//! Employee `i` belongs to department `i % departments + 1`. Each email picks a
//! sender uniformly and, with probability `1 - mixing`, a recipient from the
//! sender's department; otherwise any employee. Emails are drawn in parallel,
//! each from its own seeded RNG, so the output only depends on the config.

use crate::{
    error::Result,
    graph::{DEPARTMENT_COUNT, Employee},
};
use csv::Writer;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticConfig {
    pub nodes: u32,
    pub emails: usize,
    /// Clamped to `1..=42`.
    pub departments: u8,
    /// Share of emails sent across departments.
    pub mixing: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            nodes: 200,
            emails: 1500,
            departments: 8,
            mixing: 0.1,
            seed: 123,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmailRow {
    from: u32,
    to: u32,
}

impl SyntheticConfig {
    fn department_count(&self) -> u32 {
        u32::from(self.departments.clamp(1, DEPARTMENT_COUNT as u8))
    }

    pub fn employees(&self) -> Vec<Employee> {
        let departments = self.department_count();
        (0..self.nodes)
            .map(|id| Employee::new(id, (id % departments + 1) as u8))
            .collect()
    }

    /// Edge list. May contain repeats, which the loader collapses. Never
    /// contains self-loops.
    pub fn emails(&self) -> Vec<(u32, u32)> {
        if self.nodes < 2 {
            return Vec::new();
        }
        let departments = self.department_count();
        let nodes = self.nodes;
        let mixing = self.mixing.clamp(0.0, 1.0);
        (0..self.emails)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));
                let from = rng.gen_range(0..nodes);
                let slot = from % departments;
                let colleagues = (nodes - slot).div_ceil(departments);
                loop {
                    let to = if colleagues > 1 && !rng.gen_bool(mixing) {
                        rng.gen_range(0..colleagues) * departments + slot
                    } else {
                        rng.gen_range(0..nodes)
                    };
                    if to != from {
                        break (from, to);
                    }
                }
            })
            .collect()
    }

    /// Writes the vertex and edge tables in the loader's format.
    pub fn write_csv(&self, vertices: impl AsRef<Path>, edges: impl AsRef<Path>) -> Result<()> {
        let employees = self.employees();
        let mut writer = Writer::from_path(vertices.as_ref())?;
        for employee in &employees {
            writer.serialize(employee)?;
        }
        writer.flush()?;

        let emails = self.emails();
        let mut writer = Writer::from_path(edges.as_ref())?;
        for &(from, to) in &emails {
            writer.serialize(EmailRow { from, to })?;
        }
        writer.flush()?;

        info!(
            nodes = employees.len(),
            emails = emails.len(),
            departments = self.department_count(),
            "wrote synthetic email graph"
        );
        Ok(())
    }
}
