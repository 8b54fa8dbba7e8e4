//! Repair session: one task attempt tied to the life support meter
//!
//! Life support drains continuously while a module is open. Each submitted
//! attempt adjusts it once; a wrong answer lets the player try again after
//! confirming, a right one closes the session.

use crate::input::TaskInput;
use crate::render::{DrawSurface, RenderContext};
use crate::settings::Settings;
use crate::task::Task;

/// Life support meter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeSupport {
    level: f32,
    max: f32,
}

impl LifeSupport {
    /// Full meter
    pub fn new(max: f32) -> Self {
        Self { level: max, max }
    }

    pub fn with_level(level: f32, max: f32) -> Self {
        Self {
            level: level.clamp(0.0, max),
            max,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 { self.level / self.max } else { 0.0 }
    }

    pub fn drain(&mut self, amount: f32) {
        self.level = (self.level - amount).max(0.0);
    }

    /// Add `amount`; within `amount` of the cap snaps to full
    pub fn reward(&mut self, amount: f32) {
        if self.level >= self.max - amount {
            self.level = self.max;
        } else {
            self.level += amount;
        }
    }

    pub fn penalize(&mut self, amount: f32) {
        self.drain(amount);
    }

    pub fn is_depleted(&self) -> bool {
        self.level <= 0.0
    }
}

/// Where the attempt flow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Task accepting input
    Working,
    /// Outcome applied, waiting for confirm
    Reviewing { correct: bool },
    /// Module repaired
    Finished,
}

/// A task plus the meter it feeds
#[derive(Debug, Clone)]
pub struct RepairSession {
    task: Task,
    life: LifeSupport,
    phase: SessionPhase,
    level: u32,
    drain_rate: f32,
    reward: f32,
    penalty: f32,
    attempts: u32,
}

impl RepairSession {
    pub fn new(task: Task, life: LifeSupport, level: u32, settings: &Settings) -> Self {
        Self {
            task,
            life,
            phase: SessionPhase::Working,
            level,
            drain_rate: settings.drain_rate(level),
            reward: settings.life_reward,
            penalty: settings.life_penalty,
            attempts: 0,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn task_mut(&mut self) -> &mut Task {
        &mut self.task
    }

    pub fn life(&self) -> &LifeSupport {
        &self.life
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Submitted attempts so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn is_depleted(&self) -> bool {
        self.life.is_depleted()
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, input: &TaskInput) {
        if self.is_finished() {
            return;
        }
        self.life.drain(self.drain_rate * dt);

        match self.phase {
            SessionPhase::Working => {
                self.task.update(dt, input);
                if self.task.is_completed() {
                    self.apply_outcome();
                }
            }
            SessionPhase::Reviewing { correct } => {
                if input.confirm {
                    if correct {
                        self.phase = SessionPhase::Finished;
                        log::info!("Module repaired after {} attempt(s)", self.attempts);
                    } else {
                        self.task.reset();
                        self.phase = SessionPhase::Working;
                    }
                }
            }
            SessionPhase::Finished => {}
        }
    }

    fn apply_outcome(&mut self) {
        let correct = self.task.is_correct();
        self.attempts += 1;
        if correct {
            self.life.reward(self.reward);
            log::info!("Life support restored to {:.1}", self.life.level());
        } else {
            self.life.penalize(self.penalty);
            log::info!("Life support penalized to {:.1}", self.life.level());
        }
        self.phase = SessionPhase::Reviewing { correct };
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext) {
        self.task.render(surface, ctx);
    }
}
