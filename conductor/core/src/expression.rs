//! Expression State Machine
//!
//! Maps the assistant's abstract [`Expression`] to the concrete set of face
//! features a surface should draw, and runs the blink timer while talking.
//!
//! # Design
//!
//! The controller never touches rendering. It publishes a [`FaceState`]
//! through a `watch` channel; surfaces (the TUI's face widget, tests) read the
//! latest value whenever they draw. The mapping from expression to
//! [`FeatureSet`] is a total `match`, so every expression has exactly one
//! feature set.
//!
//! ```text
//! set_expression(e)
//!     ├─ cancel blink timer
//!     ├─ reset features (hide optional, clear blink, clear mouth modifier)
//!     ├─ apply FeatureSet::for_expression(e)
//!     └─ Talking? → spawn blink timer (every period: blink on, pulse later: off)
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::TimingConfig;
use crate::timer::TimerHandle;

/// Abstract state label driving the face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Resting face, waiting for the user
    #[default]
    Idle,
    /// Listening / waiting for the backend reply
    Thinking,
    /// Reply audio is playing
    Talking,
}

impl Expression {
    /// All expressions, in shortcut order
    pub const ALL: [Self; 3] = [Self::Idle, Self::Thinking, Self::Talking];

    /// Map a debug shortcut key to a forced expression
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::Idle),
            '2' => Some(Self::Thinking),
            '3' => Some(Self::Talking),
            _ => None,
        }
    }

    /// Short label for status lines
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Thinking => "thinking",
            Self::Talking => "talking",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Eyebrow posture when eyebrows are shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyebrowPosture {
    /// Flat, slightly furrowed brows used while thinking
    ThinkingHorizontal,
}

/// Mouth shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MouthShape {
    /// Base mouth with no modifier applied
    #[default]
    Plain,
    /// Relaxed smile
    Idle,
    /// Small pursed mouth
    Thinking,
    /// Open, animated mouth
    Talking,
}

/// Visible face features for one expression
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Whether both eyes are drawn
    pub eyes_visible: bool,
    /// Eyebrows, if shown
    pub eyebrows: Option<EyebrowPosture>,
    /// Frown marks beside the eyes
    pub frown_marks: bool,
    /// Floating question marks
    pub question_marks: bool,
    /// Sweat drop
    pub sweat: bool,
    /// Mouth shape
    pub mouth: MouthShape,
}

impl FeatureSet {
    /// The reset face: eyes open, every optional feature hidden, plain mouth
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            eyes_visible: true,
            eyebrows: None,
            frown_marks: false,
            question_marks: false,
            sweat: false,
            mouth: MouthShape::Plain,
        }
    }

    /// The feature set for `expression`
    #[must_use]
    pub const fn for_expression(expression: Expression) -> Self {
        let base = Self::reset();
        match expression {
            Expression::Idle => Self {
                mouth: MouthShape::Idle,
                ..base
            },
            Expression::Thinking => Self {
                eyes_visible: false,
                eyebrows: Some(EyebrowPosture::ThinkingHorizontal),
                frown_marks: true,
                question_marks: true,
                mouth: MouthShape::Thinking,
                ..base
            },
            Expression::Talking => Self {
                mouth: MouthShape::Talking,
                ..base
            },
        }
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::for_expression(Expression::default())
    }
}

/// Snapshot published to surfaces
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceState {
    /// Current expression
    pub expression: Expression,
    /// Features derived from the expression
    pub features: FeatureSet,
    /// Transient blink on both eyes
    pub blinking: bool,
    /// Bumped on every `set_expression`; stale blink ticks compare against it
    epoch: u64,
}

impl FaceState {
    /// An open-eyed face showing `expression`
    #[must_use]
    pub fn showing(expression: Expression) -> Self {
        Self::new(expression, 0)
    }

    fn new(expression: Expression, epoch: u64) -> Self {
        Self {
            expression,
            features: FeatureSet::for_expression(expression),
            blinking: false,
            epoch,
        }
    }
}

impl Default for FaceState {
    fn default() -> Self {
        Self::showing(Expression::default())
    }
}

/// Owns the current expression and the blink timer
#[derive(Debug)]
pub struct ExpressionController {
    tx: Arc<watch::Sender<FaceState>>,
    blink: TimerHandle,
    blink_period: Duration,
    blink_duration: Duration,
}

impl ExpressionController {
    /// Create a controller showing the idle face
    #[must_use]
    pub fn new(timing: &TimingConfig) -> Self {
        let (tx, _rx) = watch::channel(FaceState::default());
        Self {
            tx: Arc::new(tx),
            blink: TimerHandle::idle(),
            blink_period: timing.blink_period,
            blink_duration: timing.blink_duration,
        }
    }

    /// Switch to `expression`
    ///
    /// Always tears the face down first (blink timer cancelled, features
    /// reset), so calling this repeatedly with the same value is harmless.
    ///
    /// # Panics
    ///
    /// Switching to [`Expression::Talking`] spawns the blink timer and must
    /// happen inside a Tokio runtime.
    pub fn set_expression(&mut self, expression: Expression) {
        self.blink.cancel();

        let mut epoch = 0;
        self.tx.send_modify(|state| {
            epoch = state.epoch.wrapping_add(1);
            *state = FaceState::new(expression, epoch);
        });

        if expression == Expression::Talking {
            self.blink.restart(blink_loop(
                Arc::clone(&self.tx),
                epoch,
                self.blink_period,
                self.blink_duration,
            ));
        }

        tracing::debug!(expression = %expression, "Expression set");
    }

    /// Current expression
    #[must_use]
    pub fn expression(&self) -> Expression {
        self.tx.borrow().expression
    }

    /// Current feature set
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.tx.borrow().features
    }

    /// Whether the eyes are mid-blink
    #[must_use]
    pub fn is_blinking(&self) -> bool {
        self.tx.borrow().blinking
    }

    /// Whether a blink timer is scheduled
    #[must_use]
    pub fn is_blink_timer_active(&self) -> bool {
        self.blink.is_active()
    }

    /// Full snapshot of the face
    #[must_use]
    pub fn snapshot(&self) -> FaceState {
        self.tx.borrow().clone()
    }

    /// Receiver that always holds the latest face
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FaceState> {
        self.tx.subscribe()
    }

    /// Cancel the blink timer and clear any blink in progress
    pub fn shutdown(&mut self) {
        self.blink.cancel();
        self.tx.send_if_modified(|state| {
            state.epoch = state.epoch.wrapping_add(1);
            std::mem::replace(&mut state.blinking, false)
        });
    }
}

/// Every `period`: blink on, `pulse` later: blink off
fn blink_loop(
    tx: Arc<watch::Sender<FaceState>>,
    epoch: u64,
    period: Duration,
    pulse: Duration,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let tick = interval.tick().await;
            if !set_blink(&tx, epoch, true) {
                return;
            }
            time::sleep_until(tick + pulse).await;
            if !set_blink(&tx, epoch, false) {
                return;
            }
        }
    }
}

/// Apply a blink toggle if `epoch` is still current; returns false when stale
fn set_blink(tx: &watch::Sender<FaceState>, epoch: u64, on: bool) -> bool {
    let mut current = true;
    tx.send_if_modified(|state| {
        if state.epoch != epoch {
            current = false;
            return false;
        }
        if state.blinking == on {
            return false;
        }
        state.blinking = on;
        true
    });
    current
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn controller() -> ExpressionController {
        ExpressionController::new(&TimingConfig::default())
    }

    async fn advance_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_feature_sets_are_total_and_distinct() {
        let idle = FeatureSet::for_expression(Expression::Idle);
        let thinking = FeatureSet::for_expression(Expression::Thinking);
        let talking = FeatureSet::for_expression(Expression::Talking);

        assert_eq!(
            idle,
            FeatureSet {
                eyes_visible: true,
                eyebrows: None,
                frown_marks: false,
                question_marks: false,
                sweat: false,
                mouth: MouthShape::Idle,
            }
        );
        assert_eq!(
            thinking,
            FeatureSet {
                eyes_visible: false,
                eyebrows: Some(EyebrowPosture::ThinkingHorizontal),
                frown_marks: true,
                question_marks: true,
                sweat: false,
                mouth: MouthShape::Thinking,
            }
        );
        assert_eq!(
            talking,
            FeatureSet {
                eyes_visible: true,
                eyebrows: None,
                frown_marks: false,
                question_marks: false,
                sweat: false,
                mouth: MouthShape::Talking,
            }
        );
        assert_ne!(idle, talking);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Expression::from_key('1'), Some(Expression::Idle));
        assert_eq!(Expression::from_key('2'), Some(Expression::Thinking));
        assert_eq!(Expression::from_key('3'), Some(Expression::Talking));
        assert_eq!(Expression::from_key('4'), None);
    }

    #[tokio::test]
    async fn test_set_expression_is_idempotent() {
        let mut face = controller();
        for expression in Expression::ALL {
            face.set_expression(expression);
            let once = face.features();
            face.set_expression(expression);
            assert_eq!(face.features(), once);
            assert_eq!(face.features(), FeatureSet::for_expression(expression));
            assert_eq!(face.expression(), expression);
        }
        face.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_blink_cycle_while_talking() {
        let mut face = controller();
        face.set_expression(Expression::Talking);
        assert!(face.is_blink_timer_active());
        assert!(!face.is_blinking());

        advance_ms(1990).await;
        assert!(!face.is_blinking());

        advance_ms(50).await; // t = 2040
        assert!(face.is_blinking());

        advance_ms(200).await; // t = 2240
        assert!(!face.is_blinking());

        advance_ms(1800).await; // t = 4040
        assert!(face.is_blinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_blink_timer_outside_talking() {
        let mut face = controller();
        assert!(!face.is_blink_timer_active());

        face.set_expression(Expression::Thinking);
        assert!(!face.is_blink_timer_active());

        face.set_expression(Expression::Talking);
        advance_ms(2050).await;
        assert!(face.is_blinking());

        // Leaving talking mid-blink clears the blink and stops the timer
        face.set_expression(Expression::Idle);
        assert!(!face.is_blink_timer_active());
        assert!(!face.is_blinking());

        advance_ms(10_000).await;
        assert!(!face.is_blinking());
        assert_eq!(face.features(), FeatureSet::for_expression(Expression::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_talking_restarts_single_timer() {
        let mut face = controller();

        face.set_expression(Expression::Talking);
        advance_ms(1000).await;
        face.set_expression(Expression::Talking);

        // Only the restarted schedule fires: first blink at 1000 + 2000
        advance_ms(1500).await; // t = 2500
        assert!(!face.is_blinking());
        advance_ms(550).await; // t = 3050
        assert!(face.is_blinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_blinking() {
        let mut face = controller();
        face.set_expression(Expression::Talking);
        advance_ms(2050).await;
        assert!(face.is_blinking());

        face.shutdown();
        assert!(!face.is_blink_timer_active());
        assert!(!face.is_blinking());
        advance_ms(5000).await;
        assert!(!face.is_blinking());
    }

    #[tokio::test]
    async fn test_subscribers_see_latest_face() {
        let mut face = controller();
        let rx = face.subscribe();
        face.set_expression(Expression::Thinking);
        assert_eq!(rx.borrow().expression, Expression::Thinking);
        assert!(!rx.borrow().features.eyes_visible);
    }
}
