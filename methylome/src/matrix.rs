use ahash::AHashMap;
use std::collections::BTreeSet;

use crate::fragment::Fragment;

/// Reads x CpG positions. Cells are `Some(1)` methylated, `Some(0)`
/// unmethylated and `None` when the read does not cover the position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethylationMatrix {
    pub positions: Vec<u64>,
    pub read_names: Vec<String>,
    pub rows: Vec<Vec<Option<u8>>>,
}

impl MethylationMatrix {
    /// Assembles fragments into a matrix.
    ///
    /// The column set is the ascending union of every fragment position and is
    /// fixed before any row is filled. Rows keep the input order. A position
    /// repeated within one fragment keeps its last call.
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        let positions: Vec<u64> = fragments
            .iter()
            .flat_map(|f| f.calls.iter().map(|c| c.position))
            .collect::<BTreeSet<u64>>()
            .into_iter()
            .collect();

        let column_index: AHashMap<u64, usize> = positions
            .iter()
            .enumerate()
            .map(|(idx, &pos)| (pos, idx))
            .collect();

        let mut read_names = Vec::with_capacity(fragments.len());
        let mut rows = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            let mut row = vec![None; positions.len()];
            for call in &fragment.calls {
                if let Some(&col) = column_index.get(&call.position) {
                    row[col] = call.call.encode();
                }
            }
            read_names.push(fragment.name.clone());
            rows.push(row);
        }

        Self {
            positions,
            read_names,
            rows,
        }
    }

    pub fn n_reads(&self) -> usize {
        self.rows.len()
    }

    pub fn n_positions(&self) -> usize {
        self.positions.len()
    }

    /// True when there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.positions.is_empty()
    }

    pub fn get(&self, read: usize, position: u64) -> Option<u8> {
        let col = self.positions.binary_search(&position).ok()?;
        self.rows.get(read)?.get(col).copied().flatten()
    }

    pub fn column(&self, position: u64) -> Option<Vec<Option<u8>>> {
        let col = self.positions.binary_search(&position).ok()?;
        Some(self.rows.iter().map(|row| row[col]).collect())
    }

    /// Fraction of observed cells that are methylated, `None` without observations.
    pub fn methylated_fraction(&self) -> Option<f64> {
        let (methylated, observed) = self
            .rows
            .iter()
            .flatten()
            .flatten()
            .fold((0u64, 0u64), |(m, n), &cell| (m + cell as u64, n + 1));

        if observed == 0 {
            None
        } else {
            Some(methylated as f64 / observed as f64)
        }
    }
}
