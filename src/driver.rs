//! Fixed timestep driver owned by the host
//!
//! Accumulates real frame time and runs whole `SIM_DT` ticks, capped per
//! frame to prevent the spiral of death.

use crate::bridge::{ModelSlots, Presenter, present};
use crate::consts::*;
use crate::highscores::{HighScore, ScoreStore, SlotStore};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Simulation plus the host-side bookkeeping around it
#[derive(Debug)]
pub struct Driver {
    pub state: GameState,
    pub models: ModelSlots,
    pub high_score: HighScore,
    store: Box<dyn ScoreStore>,
    accumulator: f32,
}

impl Driver {
    pub fn new(settings: &Settings, seed: u64, high_score: HighScore) -> Self {
        log::info!(
            "{} ({}) seeded with {}",
            settings.variant.as_str(),
            settings.difficulty.as_str(),
            seed
        );
        Self {
            state: GameState::new(settings, seed, high_score.best),
            models: ModelSlots::default(),
            high_score,
            store: Box::new(SlotStore),
            accumulator: 0.0,
        }
    }

    /// Write improved high scores somewhere other than the platform slot
    pub fn with_store(mut self, store: impl ScoreStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Run as many ticks as `frame_dt` covers, returns the events they produced
    ///
    /// `input` is sampled once per frame and repeated for every substep; edge
    /// detection inside the tick keeps one press from firing twice.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let frame_dt = frame_dt.clamp(0.0, 0.1);
        self.accumulator += frame_dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, input, SIM_DT);
            events.append(&mut self.state.drain_events());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog the cap left behind
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in &events {
            if let GameEvent::NewHighScore(score) = event {
                if self.high_score.submit(*score) {
                    self.store.store(&self.high_score);
                }
            }
        }
        events
    }

    /// Advance one frame and push the result to a presenter
    pub fn frame<P: Presenter>(&mut self, frame_dt: f32, input: &TickInput, presenter: &mut P) {
        let events = self.advance(frame_dt, input);
        present(&self.state, &events, &self.models, presenter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::RecordingPresenter;
    use crate::sim::{Entity, EntityKind, Mode};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Keeps every score written
    #[derive(Debug, Default, Clone)]
    struct MemoryStore(Rc<RefCell<Vec<u64>>>);

    impl ScoreStore for MemoryStore {
        fn store(&mut self, score: &HighScore) {
            self.0.borrow_mut().push(score.best);
        }
    }

    /// Put the run one hit from game over with the given score
    fn doomed_run(driver: &mut Driver, score: u64) {
        let state = &mut driver.state;
        state.mode = Mode::Playing;
        state.run.score = score;
        state.player.health = 1;
        let id = state.next_entity_id();
        let pos = state.player.pos;
        state
            .obstacles
            .push(Entity::new(id, EntityKind::Asteroid, pos, Vec3::ZERO, 0.6));
    }

    #[test]
    fn test_accumulator_runs_whole_ticks() {
        let mut driver = Driver::new(&Settings::default(), 1, HighScore::default());
        // Half a tick: nothing happens yet
        driver.advance(SIM_DT * 0.5, &TickInput::default());
        assert_eq!(driver.state.mode, Mode::Loading);
        driver.advance(SIM_DT * 0.6, &TickInput::default());
        assert_eq!(driver.state.mode, Mode::Menu);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut driver = Driver::new(&Settings::default(), 1, HighScore::default());
        driver.state.mode = Mode::Playing;
        driver.advance(1.0, &TickInput::default());
        assert_eq!(driver.state.run.ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_only_improved_scores_are_written() {
        let store = MemoryStore::default();
        let mut driver = Driver::new(&Settings::default(), 1, HighScore::new(500))
            .with_store(store.clone());

        doomed_run(&mut driver, 400);
        driver.advance(SIM_DT, &TickInput::default());
        assert!(matches!(driver.state.mode, Mode::GameOver { .. }));
        assert!(store.0.borrow().is_empty());
        assert_eq!(driver.high_score.best, 500);

        doomed_run(&mut driver, 900);
        driver.advance(SIM_DT, &TickInput::default());
        assert!(matches!(driver.state.mode, Mode::GameOver { .. }));
        assert_eq!(*store.0.borrow(), vec![900]);
        assert_eq!(driver.high_score.best, 900);
    }

    #[test]
    fn test_frame_presents_events() {
        let mut driver = Driver::new(&Settings::default(), 1, HighScore::default());
        driver.state.mode = Mode::Playing;
        driver.state.run.score = 999;
        let mut presenter = RecordingPresenter::default();
        driver.frame(SIM_DT * 1.01, &TickInput::default(), &mut presenter);
        assert_eq!(presenter.banners, vec![crate::bridge::Banner::LevelUp(2)]);
        assert_eq!(presenter.huds.len(), 1);
        assert_eq!(presenter.frames.len(), 1);
    }
}
