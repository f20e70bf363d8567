use crate::config::ExperimentConfig;
use crate::error::{ConfigError, SessionError};
use crate::generator::TargetGenerator;
use crate::plan::TrialPlan;
use crate::recorder::TrialRecorder;
use crate::summary::SessionSummary;
use crate::trial::ActiveTrial;
use fitts_core::{Bounds, Outcome, Point, SessionState, Target, TrialRecord};
use fitts_timing::Clock;
use rand::Rng;

/// Abstract input delivered by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Click(Point),
    Continue,
    Abort,
}

/// Drives one participant through the configured number of target acquisitions.
///
/// The session is purely event-driven: every transition happens inside one of
/// [`start`](Self::start), [`click`](Self::click), [`acknowledge`](Self::acknowledge)
/// or [`abort`](Self::abort). Each returns whether the event was acted on; events
/// that do not apply to the current state are ignored.
pub struct TrialSession<R, C, W>
where
    R: Rng,
    C: Clock,
    W: TrialRecorder,
{
    config: ExperimentConfig,
    bounds: Bounds,
    plan: TrialPlan,
    generator: TargetGenerator<R>,
    clock: C,
    recorder: W,
    state: SessionState,
    current: Option<ActiveTrial>,
    completed: usize,
    history: Vec<TrialRecord>,
}

impl<R, C, W> TrialSession<R, C, W>
where
    R: Rng,
    C: Clock,
    W: TrialRecorder,
{
    /// Validates `config` against the canvas and builds the shuffled plan.
    pub fn new(
        config: ExperimentConfig,
        bounds: Bounds,
        mut rng: R,
        clock: C,
        recorder: W,
    ) -> Result<Self, ConfigError> {
        config.validate(bounds)?;
        let plan = TrialPlan::new(&config, &mut rng);
        log::info!(
            "Session for participant {:?}: {} trials ({} conditions x {} repetitions)",
            config.participant,
            plan.total_trials(),
            plan.conditions.len(),
            plan.repetitions,
        );

        Ok(Self {
            config,
            bounds,
            plan,
            generator: TargetGenerator::new(rng),
            clock,
            recorder,
            state: SessionState::Idle,
            current: None,
            completed: 0,
            history: Vec::new(),
        })
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Result<bool, SessionError> {
        match event {
            SessionEvent::Click(point) => self.click(point),
            SessionEvent::Continue => Ok(match self.state {
                SessionState::Idle => self.start()?,
                _ => self.acknowledge()?,
            }),
            SessionEvent::Abort => Ok(self.abort()),
        }
    }

    /// `Idle -> AwaitingClick` with a fresh target, or `Completed` when the plan
    /// is exhausted.
    pub fn start(&mut self) -> Result<bool, ConfigError> {
        if self.state != SessionState::Idle {
            return Ok(false);
        }
        self.begin_trial()?;
        Ok(true)
    }

    /// Evaluates a click. Only acted on in `AwaitingClick`.
    pub fn click(&mut self, point: Point) -> Result<bool, SessionError> {
        if !self.state.accepts_clicks() {
            log::debug!("Click at ({:.1}, {:.1}) ignored in {:?}", point.x, point.y, self.state);
            return Ok(false);
        }
        let Some(trial) = self.current.as_mut() else {
            return Ok(false);
        };

        let click_distance = trial.target.click_distance(point);

        if !trial.target.contains(point) {
            trial.misses += 1;
            self.state = SessionState::AwaitingContinue(Outcome::Miss);
            log::info!(
                "Trial {} miss #{} ({:.1} px from center)",
                self.completed + 1,
                trial.misses,
                click_distance
            );
            return Ok(true);
        }

        let number = u32::try_from(self.completed + 1)
            .map_err(|_| ConfigError::TooManyTrials(self.plan.total_trials()))?;
        let elapsed = self.clock.elapsed(trial.started);
        let record = TrialRecord {
            trial: number,
            participant: self.config.participant.clone(),
            circle_radius: trial.target.radius,
            circle_center_x: trial.target.center.x,
            circle_center_y: trial.target.center.y,
            time_taken: elapsed.as_secs_f64(),
            distance: click_distance,
            errors: trial.misses,
            direction: self.config.direction_label.clone(),
            success: true,
            start_time: trial.started.epoch_secs,
        };

        self.recorder.record(&record)?;
        log::info!(
            "Trial {}/{} acquired in {:.3} s with {} misses",
            record.trial,
            self.total_trials(),
            record.time_taken,
            record.errors
        );
        self.history.push(record);
        self.completed += 1;
        self.state = SessionState::AwaitingContinue(Outcome::Hit);
        Ok(true)
    }

    /// Continue acknowledgement after feedback.
    ///
    /// After a miss the same target is presented again with a fresh start time and
    /// the miss count kept. After a hit the next trial starts, or the session
    /// completes once every planned trial is recorded.
    pub fn acknowledge(&mut self) -> Result<bool, ConfigError> {
        match self.state {
            SessionState::AwaitingContinue(Outcome::Miss) => {
                if let Some(trial) = self.current.as_mut() {
                    trial.started = self.clock.now();
                    self.state = SessionState::AwaitingClick;
                    log::debug!("Retrying same target, {} misses so far", trial.misses);
                }
                Ok(true)
            }
            SessionState::AwaitingContinue(Outcome::Hit) => {
                self.current = None;
                if self.completed >= self.total_trials() {
                    self.complete();
                } else {
                    self.state = SessionState::Idle;
                    self.begin_trial()?;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Stops the session. Records already handed to the recorder stay persisted.
    pub fn abort(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = SessionState::Aborted;
        self.current = None;
        log::info!(
            "Session aborted after {}/{} trials",
            self.completed,
            self.total_trials()
        );
        true
    }

    /// Moves the session onto a resized canvas.
    ///
    /// Only a session that has not presented anything yet follows the new size:
    /// the configuration is revalidated against `bounds` and `Ok(true)` returned.
    /// Once a target is on screen or a trial is recorded, the bounds stay fixed
    /// and `Ok(false)` is returned.
    pub fn resize(&mut self, bounds: Bounds) -> Result<bool, ConfigError> {
        if bounds == self.bounds {
            return Ok(true);
        }
        if self.state != SessionState::Idle || self.completed > 0 {
            log::debug!(
                "Keeping {}x{} canvas in {:?}",
                self.bounds.width,
                self.bounds.height,
                self.state
            );
            return Ok(false);
        }
        self.config.validate(bounds)?;
        log::info!("Session canvas resized to {}x{}", bounds.width, bounds.height);
        self.bounds = bounds;
        Ok(true)
    }

    fn begin_trial(&mut self) -> Result<(), ConfigError> {
        if self.completed >= self.total_trials() {
            self.complete();
            return Ok(());
        }

        let target = self
            .generator
            .next_target(&self.config.target_sizes, self.bounds)?;
        let started = self.clock.now();
        self.current = Some(ActiveTrial::new(target, started));
        self.state = SessionState::AwaitingClick;

        log::info!(
            "Trial {}/{} started: radius {} at ({}, {})",
            self.completed + 1,
            self.total_trials(),
            target.radius,
            target.center.x,
            target.center.y
        );
        Ok(())
    }

    fn complete(&mut self) {
        self.state = SessionState::Completed;
        self.current = None;
        log::info!("Session completed: {} trials recorded", self.completed);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.current.as_ref().map(|t| &t.target)
    }

    /// Misses accumulated on the current target.
    pub fn current_misses(&self) -> Option<u32> {
        self.current.as_ref().map(|t| t.misses)
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total_trials(&self) -> usize {
        self.plan.total_trials()
    }

    /// `(trial number on screen, total)`, as the on-screen counter shows it.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.total_trials();
        ((self.completed + 1).min(total), total)
    }

    pub fn plan(&self) -> &TrialPlan {
        &self.plan
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn participant(&self) -> &str {
        &self.config.participant
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.history
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_records(&self.config.participant, &self.history, self.total_trials())
    }

    pub fn recorder(&self) -> &W {
        &self.recorder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::MemoryRecorder;
    use fitts_timing::ManualClock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    type TestSession = TrialSession<StdRng, ManualClock, MemoryRecorder>;

    fn small_config(repetitions: usize) -> ExperimentConfig {
        ExperimentConfig {
            participant: "P1".into(),
            target_sizes: vec![20.0],
            target_distances: vec![100.0],
            directions: vec!["left".into()],
            repetitions_per_config: repetitions,
            direction_label: "random".into(),
        }
    }

    fn session(repetitions: usize) -> (TestSession, ManualClock) {
        let clock = ManualClock::default();
        let s = TrialSession::new(
            small_config(repetitions),
            Bounds::new(800.0, 600.0),
            StdRng::seed_from_u64(3),
            clock.clone(),
            MemoryRecorder::default(),
        )
        .unwrap();
        (s, clock)
    }

    fn hit_point(s: &TestSession) -> Point {
        s.current_target().unwrap().center
    }

    fn miss_point(s: &TestSession) -> Point {
        let t = s.current_target().unwrap();
        // the canvas corner is always outside a fully visible target
        if t.center.x > 400.0 {
            Point::new(0.0, 0.0)
        } else {
            Point::new(800.0, 600.0)
        }
    }

    #[test]
    fn test_start_presents_fresh_target() {
        let (mut s, _) = session(2);
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current_target().is_none());
        assert!(s.start().unwrap());
        assert_eq!(s.state(), SessionState::AwaitingClick);
        assert_eq!(s.current_misses(), Some(0));
        assert_eq!(s.progress(), (1, 2));
        assert_eq!(s.plan().total_trials(), 2);
        assert_eq!(s.participant(), "P1");
        // a second start is ignored
        assert!(!s.start().unwrap());
    }

    #[test]
    fn test_hit_records_elapsed_time() {
        let (mut s, clock) = session(2);
        s.start().unwrap();
        clock.advance(Duration::from_millis(850));
        let p = hit_point(&s);
        assert!(s.click(p).unwrap());
        assert_eq!(s.state(), SessionState::AwaitingContinue(Outcome::Hit));

        let records = &s.recorder().records;
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.trial, 1);
        assert_eq!(r.participant, "P1");
        assert_eq!(r.circle_radius, 20.0);
        assert_eq!(r.errors, 0);
        assert_eq!(r.distance, 0.0);
        assert!(r.success);
        assert_eq!(r.direction, "random");
        assert!((r.time_taken - 0.85).abs() < 1e-9);
        assert!((r.start_time - 1_700_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_miss_retry_keeps_target_and_misses() {
        let (mut s, clock) = session(1);
        s.start().unwrap();
        let target = *s.current_target().unwrap();

        let p = miss_point(&s);
        assert!(s.click(p).unwrap());
        assert_eq!(s.state(), SessionState::AwaitingContinue(Outcome::Miss));
        assert_eq!(s.current_misses(), Some(1));
        assert!(s.recorder().records.is_empty());

        // clicks are not evaluated while feedback is showing
        assert!(!s.click(target.center).unwrap());
        assert_eq!(s.current_misses(), Some(1));

        clock.advance(Duration::from_secs(5));
        assert!(s.acknowledge().unwrap());
        assert_eq!(s.state(), SessionState::AwaitingClick);
        assert_eq!(s.current_target(), Some(&target));
        assert_eq!(s.current_misses(), Some(1));

        let p = miss_point(&s);
        s.click(p).unwrap();
        s.acknowledge().unwrap();
        assert_eq!(s.current_misses(), Some(2));

        clock.advance(Duration::from_millis(400));
        let p = hit_point(&s);
        s.click(p).unwrap();
        let r = &s.recorder().records[0];
        assert_eq!(r.errors, 2);
        // timing restarts on each presentation of the target
        assert!((r.time_taken - 0.4).abs() < 1e-9);
        assert!((r.start_time - 1_700_000_005.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_target_resets_misses() {
        let (mut s, _) = session(2);
        s.start().unwrap();
        let p = miss_point(&s);
        s.click(p).unwrap();
        s.acknowledge().unwrap();
        let p = hit_point(&s);
        s.click(p).unwrap();
        s.acknowledge().unwrap();
        assert_eq!(s.state(), SessionState::AwaitingClick);
        assert_eq!(s.current_misses(), Some(0));
        assert_eq!(s.progress(), (2, 2));
    }

    #[test]
    fn test_completes_after_total() {
        let (mut s, _) = session(3);
        s.start().unwrap();
        for _ in 0..3 {
            let p = hit_point(&s);
            s.click(p).unwrap();
            s.acknowledge().unwrap();
        }
        assert_eq!(s.state(), SessionState::Completed);
        assert!(s.current_target().is_none());
        assert_eq!(s.recorder().records.len(), 3);
        let numbers: Vec<u32> = s.records().iter().map(|r| r.trial).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        // terminal: nothing else is handled
        assert!(!s.start().unwrap());
        assert!(!s.click(Point::new(10.0, 10.0)).unwrap());
        assert!(!s.acknowledge().unwrap());
        assert!(!s.abort());
        assert_eq!(s.recorder().records.len(), 3);
    }

    #[test]
    fn test_abort_keeps_records() {
        let (mut s, _) = session(5);
        s.start().unwrap();
        let p = hit_point(&s);
        s.click(p).unwrap();
        s.acknowledge().unwrap();
        assert!(s.abort());
        assert_eq!(s.state(), SessionState::Aborted);
        assert!(s.current_target().is_none());
        assert!(!s.click(Point::new(400.0, 300.0)).unwrap());
        assert_eq!(s.recorder().records.len(), 1);
        assert_eq!(s.summary().completed, 1);
        assert_eq!(s.summary().total, 5);
    }

    #[test]
    fn test_abort_from_idle_and_feedback() {
        let (mut s, _) = session(1);
        assert!(s.abort());
        assert!(!s.start().unwrap());

        let (mut s, _) = session(1);
        s.start().unwrap();
        let p = miss_point(&s);
        s.click(p).unwrap();
        assert!(s.handle_event(SessionEvent::Abort).unwrap());
        assert_eq!(s.state(), SessionState::Aborted);
    }

    #[test]
    fn test_handle_event_dispatch() {
        let (mut s, _) = session(1);
        assert!(s.handle_event(SessionEvent::Continue).unwrap());
        assert_eq!(s.state(), SessionState::AwaitingClick);
        let p = hit_point(&s);
        assert!(s.handle_event(SessionEvent::Click(p)).unwrap());
        assert!(s.handle_event(SessionEvent::Continue).unwrap());
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_resize_before_start_moves_targets() {
        let (mut s, _) = session(3);
        let small = Bounds::new(200.0, 150.0);
        assert!(s.resize(small).unwrap());
        assert_eq!(s.bounds(), small);
        s.start().unwrap();
        for _ in 0..3 {
            let t = *s.current_target().unwrap();
            assert!(t.center.x >= t.radius && t.center.x <= small.width - t.radius);
            assert!(t.center.y >= t.radius && t.center.y <= small.height - t.radius);
            s.click(t.center).unwrap();
            s.acknowledge().unwrap();
        }
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_resize_after_start_keeps_bounds() {
        let (mut s, _) = session(2);
        let original = s.bounds();
        s.start().unwrap();
        assert!(!s.resize(Bounds::new(1024.0, 768.0)).unwrap());
        assert_eq!(s.bounds(), original);

        let p = hit_point(&s);
        s.click(p).unwrap();
        assert!(!s.resize(Bounds::new(1024.0, 768.0)).unwrap());
        assert_eq!(s.bounds(), original);
    }

    #[test]
    fn test_resize_to_tiny_canvas_is_rejected() {
        let (mut s, _) = session(1);
        let original = s.bounds();
        assert!(matches!(
            s.resize(Bounds::new(30.0, 30.0)),
            Err(ConfigError::CanvasTooSmall { .. })
        ));
        assert_eq!(s.bounds(), original);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = small_config(1);
        config.participant = "  ".into();
        let result = TrialSession::new(
            config,
            Bounds::new(800.0, 600.0),
            StdRng::seed_from_u64(0),
            ManualClock::default(),
            MemoryRecorder::default(),
        );
        assert!(matches!(result, Err(ConfigError::EmptyParticipant)));

        let result = TrialSession::new(
            small_config(1),
            Bounds::new(30.0, 600.0),
            StdRng::seed_from_u64(0),
            ManualClock::default(),
            MemoryRecorder::default(),
        );
        assert!(matches!(result, Err(ConfigError::CanvasTooSmall { .. })));
    }
}
