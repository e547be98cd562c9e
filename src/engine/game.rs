//! The game engine.
//!
//! `Engine` owns one `GameState` and is the only thing that mutates it. Hosts
//! drive it through a small set of operations:
//! - lifecycle: `start`, `toggle_pause`, `end`, `reset`
//! - time: `tick(elapsed)` advances the logical clock and the countdown
//! - input: `select(pos)` (two-click protocol) or `attempt_swap(a, b)`
//! - settings: `set_difficulty`
//! - queries: `stats`, `snapshot`, `hint`
//!
//! A committed swap resolves its whole cascade before returning; the
//! `CascadeReport` carries each step for hosts that animate the chain.

use std::time::Duration;

use crate::board::{Board, Generator, Position};
use crate::cascade::{resolve_cascade, CascadeReport};
use crate::core::{
    ConfigError, DifficultyConfig, EngineConfig, EngineError, GameRng, GameSnapshot, GameState, GameStats,
    GameStatus, KindSource,
};
use crate::matching::{find_valid_swap, swap_creates_match};
use crate::progression::update_progression;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// What a click did.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    /// Not accepting moves, or the position is off the board.
    Ignored,

    /// The position is now the pending selection.
    Selected(Position),

    /// The swap was committed and its cascade resolved.
    Swapped(CascadeReport),

    /// The pair was not a legal swap. The board is untouched and the second
    /// click became the pending selection.
    Rejected { selected: Position },
}

impl SelectOutcome {
    /// True for `Selected` and `Swapped`.
    #[must_use]
    pub fn accepted(&self) -> bool {
        matches!(self, SelectOutcome::Selected(_) | SelectOutcome::Swapped(_))
    }

    /// The cascade report of a committed swap.
    #[must_use]
    pub fn report(&self) -> Option<&CascadeReport> {
        match self {
            SelectOutcome::Swapped(report) => Some(report),
            _ => None,
        }
    }
}

/// A single match-3 game.
///
/// ```
/// use gem_cascade::{Engine, EngineConfig, GameStatus};
///
/// let mut engine = Engine::new(EngineConfig::default(), 42).unwrap();
/// assert_eq!(engine.status(), GameStatus::Ready);
///
/// engine.start();
/// if let Some((a, b)) = engine.hint() {
///     assert!(engine.attempt_swap(a, b));
/// }
/// ```
pub struct Engine<R: KindSource = GameRng> {
    config: EngineConfig,
    default_difficulty: DifficultyConfig,
    kind_count: usize,
    state: GameState,
    source: R,
    clock: Duration,
    second_accumulator: Duration,
}

impl Engine<GameRng> {
    /// Create an engine with a seeded `GameRng`.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_source(config, GameRng::new(seed))
    }

    /// Seed this engine was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.source.seed()
    }
}

impl<R: KindSource> Engine<R> {
    /// Create an engine drawing gem kinds from `source`.
    ///
    /// The configuration is validated here; the board is generated at the
    /// default difficulty.
    pub fn with_source(config: EngineConfig, mut source: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let default_difficulty = config.default_difficulty_config()?.clone();
        let state = new_game(&config, &default_difficulty, &mut source);

        Ok(Self {
            kind_count: default_difficulty.kind_count,
            default_difficulty,
            config,
            state,
            source,
            clock: Duration::ZERO,
            second_accumulator: Duration::ZERO,
        })
    }

    // === Queries ===

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Logical clock: total time passed to `tick`.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Number of gem kinds currently in play.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.kind_count
    }

    /// Statistics for the host.
    #[must_use]
    pub fn stats(&self) -> GameStats {
        self.state.stats()
    }

    /// Statistics plus the board.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// First legal swap on the board, if any.
    #[must_use]
    pub fn hint(&self) -> Option<(Position, Position)> {
        find_valid_swap(&self.state.board, self.config.min_match_length)
    }

    // === Lifecycle ===

    /// Start the clock.
    ///
    /// Returns false if the game is already running or has ended; an ended
    /// game must be `reset` first.
    pub fn start(&mut self) -> bool {
        if self.state.is_running || self.state.is_ended {
            return false;
        }
        self.state.is_running = true;
        self.state.is_paused = false;
        self.state.started_at = Some(self.clock);
        self.state.level_started_at = Some(self.clock);
        self.second_accumulator = Duration::ZERO;
        tracing::info!(
            difficulty = %self.state.difficulty,
            time_limit = self.state.time_remaining_secs,
            "game started"
        );
        true
    }

    /// Pause or resume a running game. Returns the resulting status.
    pub fn toggle_pause(&mut self) -> GameStatus {
        if self.state.is_running {
            self.state.is_paused = !self.state.is_paused;
            tracing::info!(paused = self.state.is_paused, "pause toggled");
        }
        self.status()
    }

    /// End the game.
    ///
    /// Achievements are evaluated one last time; the ids unlocked by that
    /// evaluation are returned. Ending twice is a no-op.
    pub fn end(&mut self) -> Vec<String> {
        if self.state.is_ended {
            return Vec::new();
        }
        self.state.is_running = false;
        self.state.is_paused = false;
        self.state.is_ended = true;
        self.state.selected = None;

        let progress = update_progression(&mut self.state, &self.config, self.clock);
        tracing::info!(
            score = self.state.score,
            level = self.state.level,
            achievements = self.state.achievements.len(),
            "game ended"
        );
        progress.unlocked
    }

    /// Throw the current game away and set up a new one at the default
    /// difficulty with a fresh board.
    pub fn reset(&mut self) {
        self.kind_count = self.default_difficulty.kind_count;
        self.state = new_game(&self.config, &self.default_difficulty, &mut self.source);
        self.second_accumulator = Duration::ZERO;
        tracing::info!(difficulty = %self.state.difficulty, "game reset");
    }

    /// Advance the logical clock.
    ///
    /// While the game runs unpaused, every whole second takes one second off
    /// the countdown. The game ends as soon as the countdown reads zero,
    /// paused or not. The clock saturates at `Duration::MAX`.
    pub fn tick(&mut self, elapsed: Duration) -> GameStatus {
        self.clock = self.clock.saturating_add(elapsed);

        if self.state.accepts_moves() {
            self.second_accumulator = self.second_accumulator.saturating_add(elapsed);
            while self.second_accumulator >= ONE_SECOND && self.state.time_remaining_secs > 0 {
                self.second_accumulator -= ONE_SECOND;
                self.state.time_remaining_secs -= 1;
            }
        }

        if self.state.is_running && self.state.time_remaining_secs == 0 {
            tracing::info!("time is up");
            self.end();
        }
        self.status()
    }

    // === Settings ===

    /// Switch difficulty.
    ///
    /// The countdown restarts at the new limit and refills draw from the new
    /// kind count. The board already in play is kept.
    pub fn set_difficulty(&mut self, id: &str) -> Result<(), EngineError> {
        let difficulty = self
            .config
            .difficulty(id)
            .ok_or_else(|| EngineError::UnknownDifficulty(id.to_string()))?;

        self.kind_count = difficulty.kind_count;
        self.state.difficulty = difficulty.id.clone();
        self.state.time_remaining_secs = difficulty.time_limit_secs;
        self.second_accumulator = Duration::ZERO;
        tracing::info!(
            difficulty = %difficulty.id,
            kind_count = difficulty.kind_count,
            time_limit = difficulty.time_limit_secs,
            "difficulty changed"
        );
        Ok(())
    }

    // === Input ===

    /// Handle a click on `pos`.
    ///
    /// The first click records a selection. The second click completes a
    /// swap if the two cells are adjacent and swapping them creates a match;
    /// otherwise the board is left as it was and the second click becomes the
    /// new selection.
    pub fn select(&mut self, pos: Position) -> SelectOutcome {
        if !self.state.accepts_moves() || !self.state.board.contains(pos) {
            return SelectOutcome::Ignored;
        }

        let Some(first) = self.state.selected else {
            self.state.selected = Some(pos);
            return SelectOutcome::Selected(pos);
        };

        if swap_creates_match(&mut self.state.board, first, pos, self.config.min_match_length) {
            SelectOutcome::Swapped(self.commit_swap(first, pos))
        } else {
            self.state.selected = Some(pos);
            self.state.invalid_moves += 1;
            self.state.invalid_moves_this_level += 1;
            tracing::debug!(%first, second = %pos, "swap rejected");
            SelectOutcome::Rejected { selected: pos }
        }
    }

    /// Try to swap `a` and `b` directly.
    ///
    /// Any pending selection is replaced by `a`, then `b` is clicked. Returns
    /// true iff the swap was committed.
    pub fn attempt_swap(&mut self, a: Position, b: Position) -> bool {
        self.swap(a, b).report().is_some()
    }

    /// Like `attempt_swap`, returning the full outcome.
    pub fn swap(&mut self, a: Position, b: Position) -> SelectOutcome {
        let board = &self.state.board;
        if !self.state.accepts_moves() || !board.contains(a) || !board.contains(b) {
            return SelectOutcome::Ignored;
        }
        self.state.selected = Some(a);
        self.select(b)
    }

    fn commit_swap(&mut self, a: Position, b: Position) -> CascadeReport {
        self.state.board.swap(a, b);
        self.state.selected = None;
        self.state.last_move_at = Some(self.clock);
        tracing::debug!(%a, %b, "swap committed");

        let report = resolve_cascade(
            &mut self.state,
            &self.config,
            self.kind_count,
            &mut self.source,
            self.clock,
        );
        tracing::debug!(
            chain = report.chain_length(),
            gained = report.score_gained(),
            score = self.state.score,
            "cascade resolved"
        );
        report
    }
}

impl<R: KindSource> std::fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("status", &self.status())
            .field("difficulty", &self.state.difficulty)
            .field("score", &self.state.score)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

fn new_game<R: KindSource + ?Sized>(config: &EngineConfig, difficulty: &DifficultyConfig, source: &mut R) -> GameState {
    let report = Generator::new(config.grid_size, difficulty.kind_count)
        .with_min_match_length(config.min_match_length)
        .with_max_attempts(config.generation_attempts)
        .generate(source);
    tracing::debug!(attempts = report.attempts, converged = report.converged, "board generated");
    GameState::new(report.board, difficulty.id.clone(), difficulty.time_limit_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_new_engine_is_ready() {
        let engine = engine();

        assert_eq!(engine.status(), GameStatus::Ready);
        assert_eq!(engine.kind_count(), 4);
        assert_eq!(engine.state().difficulty, "medium");
        assert_eq!(engine.state().time_remaining_secs, 90);
        assert!(engine.board().is_full());
        assert_eq!(engine.seed(), 7);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_grid_size(2);
        assert!(matches!(Engine::new(config, 1), Err(ConfigError::GridTooSmall { .. })));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut engine = engine();
        engine.tick(secs(3));

        assert!(engine.start());
        assert_eq!(engine.state().started_at, Some(secs(3)));

        engine.tick(secs(2));
        assert!(!engine.start());
        assert_eq!(engine.state().started_at, Some(secs(3)));
    }

    #[test]
    fn test_countdown_counts_whole_seconds() {
        let mut engine = engine();
        engine.start();

        engine.tick(Duration::from_millis(600));
        assert_eq!(engine.state().time_remaining_secs, 90);

        engine.tick(Duration::from_millis(600));
        assert_eq!(engine.state().time_remaining_secs, 89);

        engine.tick(Duration::from_millis(2_800));
        assert_eq!(engine.state().time_remaining_secs, 86);
    }

    #[test]
    fn test_pause_freezes_countdown() {
        let mut engine = engine();
        engine.start();

        assert_eq!(engine.toggle_pause(), GameStatus::Paused);
        engine.tick(secs(30));
        assert_eq!(engine.state().time_remaining_secs, 90);
        assert_eq!(engine.clock(), secs(30));

        assert_eq!(engine.toggle_pause(), GameStatus::Running);
        engine.tick(secs(30));
        assert_eq!(engine.state().time_remaining_secs, 60);
    }

    #[test]
    fn test_timeout_overrides_pause() {
        let mut engine = engine();
        engine.start();
        engine.toggle_pause();
        engine.state.time_remaining_secs = 0;

        assert_eq!(engine.tick(Duration::ZERO), GameStatus::Ended);
        assert!(!engine.state().is_paused);
    }

    #[test]
    fn test_timeout_ends_game() {
        let mut engine = engine();
        engine.set_difficulty("hard").unwrap();
        engine.start();

        assert_eq!(engine.tick(secs(59)), GameStatus::Running);
        assert_eq!(engine.tick(secs(1)), GameStatus::Ended);
        assert!(!engine.start());
    }

    #[test]
    fn test_toggle_pause_needs_running_game() {
        let mut engine = engine();
        assert_eq!(engine.toggle_pause(), GameStatus::Ready);
        assert!(!engine.state().is_paused);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut engine = engine();
        engine.start();

        engine.end();
        let score = engine.state().score;
        assert!(engine.end().is_empty());
        assert_eq!(engine.state().score, score);
        assert_eq!(engine.status(), GameStatus::Ended);
    }

    #[test]
    fn test_quick_end_is_not_speed_demon() {
        // Ending early completes no level
        let mut engine = engine();
        engine.start();
        engine.tick(secs(10));

        let unlocked = engine.end();

        assert!(!unlocked.contains(&"speed_demon".to_string()));
        assert_eq!(engine.state().fastest_level, None);
        assert_eq!(engine.state().score, 0);
    }

    #[test]
    fn test_start_opens_level_timer() {
        let mut engine = engine();
        engine.tick(secs(8));
        engine.start();

        assert_eq!(engine.state().level_started_at, Some(secs(8)));
    }

    #[test]
    fn test_tick_saturates() {
        let mut idle = engine();
        idle.tick(Duration::MAX);
        idle.tick(Duration::MAX);
        assert_eq!(idle.clock(), Duration::MAX);
        assert_eq!(idle.status(), GameStatus::Ready);

        let mut running = engine();
        running.start();
        assert_eq!(running.tick(Duration::MAX), GameStatus::Ended);
        assert_eq!(running.tick(Duration::MAX), GameStatus::Ended);
        assert_eq!(running.clock(), Duration::MAX);
        assert_eq!(running.state().time_remaining_secs, 0);
    }

    #[test]
    fn test_paused_tick_saturates() {
        let mut engine = engine();
        engine.start();
        engine.tick(secs(5));
        engine.toggle_pause();

        assert_eq!(engine.tick(Duration::MAX), GameStatus::Paused);
        assert_eq!(engine.tick(Duration::MAX), GameStatus::Paused);
        assert_eq!(engine.clock(), Duration::MAX);
        assert_eq!(engine.state().time_remaining_secs, 85);
    }

    #[test]
    fn test_set_difficulty() {
        let mut engine = engine();

        engine.set_difficulty("easy").unwrap();
        assert_eq!(engine.kind_count(), 3);
        assert_eq!(engine.state().time_remaining_secs, 120);
        assert_eq!(engine.stats().difficulty, "easy");

        assert_eq!(
            engine.set_difficulty("nightmare"),
            Err(EngineError::UnknownDifficulty("nightmare".to_string()))
        );
        assert_eq!(engine.state().difficulty, "easy");
        assert_eq!(engine.kind_count(), 3);
    }

    #[test]
    fn test_reset_restores_default_difficulty() {
        let mut engine = engine();
        engine.set_difficulty("hard").unwrap();
        engine.start();
        engine.tick(secs(5));
        engine.end();

        engine.reset();

        assert_eq!(engine.status(), GameStatus::Ready);
        assert_eq!(engine.state().difficulty, "medium");
        assert_eq!(engine.state().time_remaining_secs, 90);
        assert_eq!(engine.state().score, 0);
        assert!(engine.state().achievements.is_empty());
        assert_eq!(engine.kind_count(), 4);
        assert!(engine.start());
    }

    #[test]
    fn test_select_ignored_when_not_running() {
        let mut engine = engine();

        assert_eq!(engine.select(Position::new(0, 0)), SelectOutcome::Ignored);
        assert_eq!(engine.state().selected, None);

        engine.start();
        engine.toggle_pause();
        assert_eq!(engine.select(Position::new(0, 0)), SelectOutcome::Ignored);
    }

    #[test]
    fn test_select_off_board_ignored() {
        let mut engine = engine();
        engine.start();

        assert_eq!(engine.select(Position::new(8, 0)), SelectOutcome::Ignored);
        assert!(!engine.attempt_swap(Position::new(0, 0), Position::new(0, 8)));
    }

    #[test]
    fn test_same_cell_twice_is_rejected() {
        let mut engine = engine();
        engine.start();
        let pos = Position::new(2, 2);

        assert_eq!(engine.select(pos), SelectOutcome::Selected(pos));
        assert_eq!(engine.select(pos), SelectOutcome::Rejected { selected: pos });
        assert_eq!(engine.state().selected, Some(pos));
        assert_eq!(engine.state().invalid_moves, 1);
    }

    #[test]
    fn test_debug_output() {
        let engine = engine();
        let debug = format!("{:?}", engine);
        assert!(debug.contains("Engine"));
        assert!(debug.contains("Ready"));
    }
}
