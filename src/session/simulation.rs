//! Simulation session - Owns the grid, rules and gradient for one run.
//!
//! The session is single-threaded. The only concurrent actor is a pattern
//! producer, which talks to it exclusively through a [`PatternIntake`].

use std::fmt;
use std::time::Duration;

use crate::compute::{Cell, Gradient, Grid, RuleSet, TickStats};
use crate::error::Result;
use crate::pattern::{self, Pattern};
use crate::schema::{LifeConfig, RgbaColor, parse_color_triplets};

use super::PatternIntake;

/// Key bindings, printed for [`Key::Help`].
pub const KEYS_HELP: &str = "\
h           - Print help
<space>     - Toggle pause/play
c           - Toggle color
q           - Quit
s           - Single step
r           - Reset the game";

/// Keyboard commands understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Help,
    Pause,
    Color,
    Quit,
    Step,
    Reset,
}

impl Key {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'h' => Some(Key::Help),
            ' ' => Some(Key::Pause),
            'c' => Some(Key::Color),
            'q' => Some(Key::Quit),
            's' => Some(Key::Step),
            'r' => Some(Key::Reset),
            _ => None,
        }
    }
}

/// Input events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Quit,
    KeyDown(Key),
    /// Pointer position in pixels.
    MouseClick { x: u32, y: u32 },
    PatternSubmitted(Pattern),
}

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// A running Life world.
pub struct Simulation {
    config: LifeConfig,
    grid: Grid,
    /// Active rulestring, possibly overridden by a decoded pattern.
    rule: String,
    rules: RuleSet,
    gradient: Gradient,
    /// Ticks on which the live count changed.
    generation: u64,
    live_cells: usize,
    last_delta: i64,
    paused: bool,
    single_step: bool,
    color: bool,
    intake: Option<PatternIntake>,
}

impl Simulation {
    /// Validate `config`, build the gradient and create the initial world.
    pub fn new(config: LifeConfig) -> Result<Self> {
        config.validate()?;

        let colors = parse_color_triplets(&config.colors)?;
        let gradient = Gradient::build(config.gradient, &colors, config.max_age)?;
        log::debug!("{} gradient:\n{}", config.gradient, gradient);

        let mut sim = Self {
            grid: Grid::new(config.columns, config.rows),
            rule: config.rule.clone(),
            rules: RuleSet::default(),
            gradient,
            generation: 0,
            live_cells: 0,
            last_delta: 0,
            paused: config.pause,
            single_step: false,
            color: config.color,
            intake: None,
            config,
        };
        sim.reset()?;
        Ok(sim)
    }

    /// Replace the world with a fresh one.
    ///
    /// Loads the configured pattern file if there is one, otherwise fills the
    /// grid randomly unless the config asks for an empty world. On error the
    /// current world is left untouched.
    pub fn reset(&mut self) -> Result<()> {
        let mut grid = Grid::new(self.config.columns, self.config.rows);

        let rule = match &self.config.pattern_file {
            Some(path) => {
                log::info!("Loading pattern {}", path.display());
                let pattern = Pattern::load(path)?;
                pattern::decode(&mut grid, &pattern, &self.config.rule)?
            }
            None => {
                if !self.config.empty {
                    grid.randomize(self.config.seed, self.config.fill_ratio);
                }
                self.config.rule.clone()
            }
        };
        let (rule, rules) = match RuleSet::parse(&rule) {
            Ok(rules) => (rule, rules),
            // Only the configured rule is fatal; a bad pattern rule falls back to it
            Err(e) if rule != self.config.rule => {
                log::warn!("Keeping rule {}: {}", self.config.rule, e);
                let rules = RuleSet::parse(&self.config.rule)?;
                (self.config.rule.clone(), rules)
            }
            Err(e) => return Err(e),
        };

        self.live_cells = grid.live_cells();
        self.grid = grid;
        self.rule = rule;
        self.rules = rules;
        self.generation = 0;
        self.last_delta = 0;
        Ok(())
    }

    /// Route submitted patterns from `intake` into this session.
    pub fn attach_intake(&mut self, intake: PatternIntake) {
        self.intake = Some(intake);
    }

    /// Advance the world one tick regardless of pause state.
    pub fn step(&mut self) -> TickStats {
        let stats = self.grid.tick(&self.rules);
        if stats.delta != 0 {
            self.generation += 1;
        }
        self.live_cells = stats.live_cells;
        self.last_delta = stats.delta;
        stats
    }

    /// One iteration of the run loop.
    ///
    /// Ticks unless paused (a pending single step ticks once), then applies at
    /// most one submitted pattern. Returns the tick stats if a tick ran.
    pub fn advance(&mut self) -> Option<TickStats> {
        let stats = if !self.paused || self.single_step {
            self.single_step = false;
            Some(self.step())
        } else {
            None
        };

        if let Some(pattern) = self.intake.as_mut().and_then(PatternIntake::poll) {
            if let Err(e) = self.apply_pattern(&pattern) {
                log::warn!("Pattern error: {}", e);
            }
        }

        stats
    }

    /// Decode `pattern` onto the running grid.
    ///
    /// On error, cells written before the failing line remain.
    pub fn apply_pattern(&mut self, pattern: &Pattern) -> Result<()> {
        let decoded = pattern::decode(&mut self.grid, pattern, &self.rule);
        self.live_cells = self.grid.live_cells();
        self.adopt_rule(decoded?);
        Ok(())
    }

    /// Like [`Simulation::apply_pattern`], but leaves the grid untouched
    /// unless the whole pattern decodes.
    pub fn apply_pattern_atomic(&mut self, pattern: &Pattern) -> Result<()> {
        let rule = pattern::decode_atomic(&mut self.grid, pattern, &self.rule)?;
        self.live_cells = self.grid.live_cells();
        self.adopt_rule(rule);
        Ok(())
    }

    fn adopt_rule(&mut self, rule: String) {
        if rule == self.rule {
            return;
        }
        match RuleSet::parse(&rule) {
            Ok(rules) => {
                log::info!("Rule changed from {} to {}", self.rule, rule);
                self.rules = rules;
                self.rule = rule;
            }
            Err(e) => log::warn!("Keeping rule {}: {}", self.rule, e),
        }
    }

    /// Handle one host event.
    pub fn dispatch(&mut self, event: Event) -> Flow {
        match event {
            Event::Quit => Flow::Quit,
            Event::KeyDown(key) => self.handle_key(key),
            Event::MouseClick { x, y } => {
                match self.cell_details(x, y) {
                    Some(cell) => log::info!("{}, {} = {:?}", cell.x, cell.y, cell),
                    None => log::warn!("Pointer ({}, {}) is outside the grid", x, y),
                }
                Flow::Continue
            }
            Event::PatternSubmitted(pattern) => {
                if let Err(e) = self.apply_pattern(&pattern) {
                    log::warn!("Pattern error: {}", e);
                }
                Flow::Continue
            }
        }
    }

    fn handle_key(&mut self, key: Key) -> Flow {
        match key {
            Key::Help => return Flow::ShowHelp,
            Key::Quit => return Flow::Quit,
            Key::Pause => self.paused = !self.paused,
            Key::Color => self.color = !self.color,
            Key::Step => {
                self.paused = true;
                self.single_step = true;
            }
            Key::Reset => {
                if let Err(e) = self.reset() {
                    log::warn!("Reset failed: {}", e);
                }
            }
        }
        Flow::Continue
    }

    /// Status text shown under the grid.
    pub fn status_line(&self) -> String {
        format!(
            "age: {:5} alive: {:5} change: {:5}",
            self.generation, self.live_cells, self.last_delta
        )
    }

    /// Foreground color for a live cell.
    pub fn cell_color(&self, cell: &Cell) -> RgbaColor {
        if self.color {
            self.gradient.color_for_age(cell.age)
        } else {
            RgbaColor::WHITE
        }
    }

    /// Cell under the pointer at pixel position (x, y).
    pub fn cell_details(&self, x: u32, y: u32) -> Option<&Cell> {
        let size = self.config.cell_size;
        self.grid.cell(x as usize / size, y as usize / size)
    }

    /// Wall-clock time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.config.fps))
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn live_cells(&self) -> usize {
        self.live_cells
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("columns", &self.grid.columns())
            .field("rows", &self.grid.rows())
            .field("rule", &self.rule)
            .field("generation", &self.generation)
            .field("live_cells", &self.live_cells)
            .field("paused", &self.paused)
            .finish()
    }
}
