use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::environment::{Cell, GridWorld};
use crate::observer::TrainingObserver;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// Grid as text: `G` goal, `A` agent, `.` empty.
pub fn render_grid(grid: &GridWorld, agent: Cell) -> String {
    let mut out = String::with_capacity(grid.cell_count() * 3);
    for cell in grid.cells() {
        let symbol = if grid.is_goal(cell) {
            'G'
        } else if cell == agent {
            'A'
        } else {
            '.'
        };
        out.push(symbol);
        if grid.position(cell).col + 1 == grid.size() {
            out.push('\n');
        } else {
            out.push_str("  ");
        }
    }
    out
}

/// Redraws the grid after every move, pausing `delay` between frames.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    delay: Duration,
    clear: bool,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout(delay: Duration) -> Self {
        Self::new(io::stdout(), delay, true)
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, delay: Duration, clear: bool) -> Self {
        Self { out, delay, clear }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, grid: &GridWorld, agent: Cell) {
        let frame = render_grid(grid, agent);
        let clear = if self.clear { CLEAR_SCREEN } else { "" };
        if let Err(err) = writeln!(self.out, "{}{}", clear, frame).and_then(|_| self.out.flush()) {
            warn!(%err, "Failed to draw grid");
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl<W: Write> TrainingObserver for ConsoleRenderer<W> {
    fn on_episode_start(&mut self, _episode: usize, grid: &GridWorld, start: Cell) {
        self.draw(grid, start);
    }

    fn on_step(&mut self, grid: &GridWorld, cell: Cell) {
        self.draw(grid, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_goal_and_agent() {
        let grid = GridWorld::new(3, Cell(4), 10.0, 0.0).unwrap();
        assert_eq!(render_grid(&grid, Cell(0)), "A  .  .\n.  G  .\n.  .  .\n");
    }

    #[test]
    fn renderer_draws_each_step() {
        let grid = GridWorld::new(2, Cell(3), 10.0, 0.0).unwrap();
        let mut renderer = ConsoleRenderer::new(Vec::new(), Duration::ZERO, false);
        renderer.on_episode_start(0, &grid, Cell(0));
        renderer.on_step(&grid, Cell(1));
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "A  .\n.  G\n\n.  A\n.  G\n\n");
    }
}
