//! Frame-by-frame driver for animated runs.
//!
//! The frame clock (browser `requestAnimationFrame`, a terminal timer) calls
//! [`Animation::next_frame`] once per tick. Stopping just means no more
//! frames are produced; the engine holds nothing that needs releasing.

use crate::error::Result;
use crate::evolve::{next_generation, Boundary, Generation};
use crate::row::Row;
use crate::rule::{NeighborhoodIndex, Rule};

/// One animated row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Generation number, 0 for the initial row.
    pub index: usize,
    pub row: Row,
    pub trace: Vec<NeighborhoodIndex>,
}

#[derive(Debug, Clone)]
pub struct Animation {
    rule: Rule,
    boundary: Boundary,
    height: usize,
    // Last emitted generation; `None` before the first frame.
    prev: Option<Row>,
    initial: Row,
    emitted: usize,
    stopped: bool,
}

impl Animation {
    pub fn new(initial: Row, rule: Rule, height: usize, boundary: Boundary) -> Self {
        tracing::debug!(rule = rule.code(), height, "animation start");
        Self {
            rule,
            boundary,
            height,
            prev: None,
            initial,
            emitted: 0,
            stopped: false,
        }
    }

    /// Produce the next frame, or `None` once `height` frames were emitted or
    /// the animation was stopped.
    pub fn next_frame(&mut self) -> Option<Result<Frame>> {
        if !self.is_running() {
            return None;
        }

        let generation = match &self.prev {
            None => Generation::initial(self.initial.clone()),
            Some(prev) => match next_generation(prev, &self.rule, self.boundary) {
                Ok(g) => g,
                Err(e) => {
                    self.stopped = true;
                    return Some(Err(e));
                }
            },
        };

        let index = self.emitted;
        self.emitted += 1;
        self.prev = Some(generation.row.clone());
        if self.emitted >= self.height {
            tracing::debug!(frames = self.emitted, "animation finished");
        }

        Some(Ok(Frame {
            index,
            row: generation.row,
            trace: generation.trace,
        }))
    }

    /// Cancel mid-run; frames already emitted stay valid.
    pub fn stop(&mut self) {
        if !self.stopped {
            tracing::debug!(frames = self.emitted, "animation stopped");
        }
        self.stopped = true;
    }

    pub fn is_running(&self) -> bool {
        !self.stopped && self.emitted < self.height
    }

    pub fn frames_emitted(&self) -> usize {
        self.emitted
    }
}

impl Iterator for Animation {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::run_automaton;
    use crate::row::fit_to_width;

    #[test]
    fn frames_match_full_run() {
        let rule = Rule::from_code(30);
        let initial = fit_to_width(&[], 21).unwrap();
        let full = run_automaton(&initial, &rule, 10, Boundary::Periodic).unwrap();

        let frames: Vec<Frame> = Animation::new(initial, rule, 10, Boundary::Periodic)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(frames.len(), 10);
        assert!(frames[0].trace.iter().all(|&t| t == 0));
        for (f, row) in frames.iter().zip(&full) {
            assert_eq!(&f.row, row);
        }
        assert_eq!(frames[9].index, 9);
    }

    #[test]
    fn stop_cancels_remaining_frames() {
        let initial = fit_to_width(&[], 9).unwrap();
        let mut anim = Animation::new(initial, Rule::from_code(90), 100, Boundary::Fixed);
        assert!(anim.next_frame().is_some());
        assert!(anim.next_frame().is_some());
        anim.stop();
        assert!(!anim.is_running());
        assert!(anim.next_frame().is_none());
        assert_eq!(anim.frames_emitted(), 2);
    }
}
