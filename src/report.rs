use std::io;

use serde::Serialize;

use crate::environment::{Action, Cell, GridWorld};
use crate::error::Result;
use crate::q_table::QTable;

#[derive(Debug, Clone, PartialEq)]
pub struct CellValues {
    pub cell: Cell,
    pub values: Vec<(Action, f64)>,
}

/// One CSV line: a single legal (cell, action) pair.
#[derive(Debug, Serialize)]
struct ValueRecord {
    cell: usize,
    row: usize,
    col: usize,
    action: Action,
    value: f64,
    goal: bool,
}

/// Snapshot of every legal action value and the goal cell.
#[derive(Debug, Clone, PartialEq)]
pub struct QTableReport {
    pub size: usize,
    pub goal: Cell,
    pub cells: Vec<CellValues>,
}

impl QTableReport {
    pub fn new(grid: &GridWorld, q_table: &QTable) -> Self {
        let cells = grid
            .cells()
            .map(|cell| CellValues {
                cell,
                values: q_table.row(cell).collect(),
            })
            .collect();
        Self {
            size: grid.size(),
            goal: grid.goal(),
            cells,
        }
    }

    pub fn value(&self, cell: Cell, action: Action) -> Option<f64> {
        self.cells
            .get(cell.index())?
            .values
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, v)| *v)
    }

    pub fn write_table<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for cell_values in &self.cells {
            write!(out, "State {}:", cell_values.cell)?;
            for (action, value) in &cell_values.values {
                write!(out, " {}={:.4}", action, value)?;
            }
            writeln!(out)?;
        }
        writeln!(out, "Destination: {}", self.goal)
    }

    pub fn write_csv<W: io::Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        for cell_values in &self.cells {
            let row = cell_values.cell.index() / self.size;
            let col = cell_values.cell.index() % self.size;
            for (action, value) in &cell_values.values {
                writer.serialize(ValueRecord {
                    cell: cell_values.cell.index(),
                    row,
                    col,
                    action: *action,
                    value: *value,
                    goal: cell_values.cell == self.goal,
                })?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Greedy move per cell as arrows, `G` on the goal and `?` where every
    /// legal action is still tied.
    pub fn policy_map(&self) -> String {
        let mut map = String::new();
        for cell_values in &self.cells {
            let symbol = if cell_values.cell == self.goal {
                'G'
            } else {
                best_arrow(&cell_values.values)
            };
            map.push(symbol);
            if (cell_values.cell.index() + 1) % self.size == 0 {
                map.push('\n');
            } else {
                map.push(' ');
            }
        }
        map
    }
}

fn best_arrow(values: &[(Action, f64)]) -> char {
    let best = values
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let winners: Vec<Action> = values
        .iter()
        .filter(|(_, v)| *v == best)
        .map(|(a, _)| *a)
        .collect();
    match winners.as_slice() {
        [only] => only.arrow(),
        _ => '?',
    }
}
