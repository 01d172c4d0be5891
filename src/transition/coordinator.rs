use std::fmt;
use std::time::Duration;

use crate::direction::Direction;
use crate::error::SlideResult;
use crate::style::TimingCurve;

use super::timer::ExitTimers;

/// Key of one mounted view; a change of token is what starts a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionToken(String);

impl TransitionToken {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransitionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub curve: TimingCurve,
    pub destroy_on_exit: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
            curve: TimingCurve::Ease,
            destroy_on_exit: true,
        }
    }
}

/// How the rendering layer learns that an exit finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingProps {
    /// Exit completes after the full duration.
    Timeout(Duration),
    /// Exit never completes; the view stays mounted.
    NoopEndListener,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// One view mounted, no transition classes.
    Steady,
    Transitioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRole {
    Current,
    /// Waiting for its exit timer.
    Exiting,
    /// Exited with the no-op listener; mounted and inert.
    Retained,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedView {
    pub token: TransitionToken,
    pub role: ViewRole,
    pub direction: Direction,
    pub classes: Vec<String>,
}

#[derive(Debug)]
struct CurrentView {
    token: TransitionToken,
    direction: Direction,
}

#[derive(Debug)]
struct ExitingView {
    token: TransitionToken,
    direction: Direction,
    exit_id: u64,
    timed: bool,
}

pub struct TransitionCoordinator {
    timing: Timing,
    current: Option<CurrentView>,
    exiting: Vec<ExitingView>,
    timers: ExitTimers,
    next_exit_id: u64,
}

impl TransitionCoordinator {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            current: None,
            exiting: Vec::new(),
            timers: ExitTimers::new(),
            next_exit_id: 0,
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn timing_props(&self) -> TimingProps {
        if self.timing.destroy_on_exit {
            TimingProps::Timeout(self.timing.duration)
        } else {
            TimingProps::NoopEndListener
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.current, self.exiting.is_empty()) {
            (None, _) => Phase::Idle,
            (Some(_), true) => Phase::Steady,
            (Some(_), false) => Phase::Transitioning,
        }
    }

    pub fn current_token(&self) -> Option<&TransitionToken> {
        self.current.as_ref().map(|current| &current.token)
    }

    /// Makes `token` the current view. The previous view starts exiting with
    /// `direction`, which stays fixed for that exit even if later navigations
    /// resolve a different direction.
    pub fn begin(
        &mut self,
        token: TransitionToken,
        direction: Direction,
    ) -> SlideResult<TransitionToken> {
        let Some(previous) = self.current.take() else {
            tracing::debug!(%token, "initial mount");
            self.current = Some(CurrentView {
                token: token.clone(),
                direction: Direction::Undirected,
            });
            return Ok(token);
        };

        if previous.token == token {
            self.current = Some(previous);
            return Ok(token);
        }

        // A view re-entering before its exit finished is pulled back; its
        // timer still fires but no longer matches anything.
        self.exiting.retain(|view| view.token != token);

        let exit_id = self.next_exit_id;
        self.next_exit_id = self.next_exit_id.wrapping_add(1);
        let timed = self.timing.destroy_on_exit;
        if timed {
            self.timers.schedule(exit_id, self.timing.duration)?;
        }
        tracing::debug!(from = %previous.token, to = %token, direction = direction.id(), timed, "transition started");
        self.exiting.push(ExitingView {
            token: previous.token,
            direction,
            exit_id,
            timed,
        });
        self.current = Some(CurrentView {
            token: token.clone(),
            direction,
        });
        Ok(token)
    }

    /// Unmounts views whose exit timer fired; returns their tokens.
    pub fn poll_exits(&mut self) -> Vec<TransitionToken> {
        self.timers
            .drain()
            .into_iter()
            .filter_map(|exit_id| self.complete(exit_id))
            .collect()
    }

    /// Waits for the next exit to complete. `None` when no timed exit is pending.
    pub async fn next_exit(&mut self) -> Option<TransitionToken> {
        loop {
            if !self.exiting.iter().any(|view| view.timed) {
                return None;
            }
            let exit_id = self.timers.recv().await?;
            if let Some(token) = self.complete(exit_id) {
                return Some(token);
            }
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn mounted(&self) -> Vec<MountedView> {
        let only_child = self.exiting.is_empty();
        let mut views = Vec::with_capacity(self.exiting.len() + 1);

        if let Some(current) = &self.current {
            views.push(MountedView {
                token: current.token.clone(),
                role: ViewRole::Current,
                direction: current.direction,
                classes: if only_child {
                    Vec::new()
                } else {
                    marker_classes(current.direction, "enter")
                },
            });
        }

        for view in &self.exiting {
            views.push(MountedView {
                token: view.token.clone(),
                role: if view.timed {
                    ViewRole::Exiting
                } else {
                    ViewRole::Retained
                },
                direction: view.direction,
                classes: marker_classes(view.direction, "exit"),
            });
        }
        views
    }

    /// Aborts pending timers and unmounts everything.
    pub fn teardown(&mut self) {
        self.timers.shutdown();
        self.exiting.clear();
        self.current = None;
    }

    fn complete(&mut self, exit_id: u64) -> Option<TransitionToken> {
        let index = self
            .exiting
            .iter()
            .position(|view| view.timed && view.exit_id == exit_id)?;
        let view = self.exiting.remove(index);
        tracing::debug!(token = %view.token, "exit complete");
        Some(view.token)
    }
}

fn marker_classes(direction: Direction, stage: &str) -> Vec<String> {
    let dir = direction.id();
    vec![format!("{dir}-{stage}"), format!("{dir}-{stage}-active")]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Phase, Timing, TimingProps, TransitionCoordinator, TransitionToken, ViewRole};
    use crate::direction::Direction;
    use crate::style::TimingCurve;

    fn timing(destroy_on_exit: bool) -> Timing {
        Timing {
            duration: Duration::from_millis(200),
            curve: TimingCurve::Ease,
            destroy_on_exit,
        }
    }

    fn token(key: &str) -> TransitionToken {
        TransitionToken::new(key)
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn initial_mount_is_steady_without_classes() {
        let mut coordinator = TransitionCoordinator::new(timing(false));
        assert_eq!(coordinator.phase(), Phase::Idle);

        coordinator
            .begin(token("/"), Direction::Forward)
            .expect("begin");
        assert_eq!(coordinator.phase(), Phase::Steady);
        let mounted = coordinator.mounted();
        assert_eq!(mounted.len(), 1);
        assert!(mounted[0].classes.is_empty());
    }

    #[test]
    fn same_token_does_not_start_a_transition() {
        let mut coordinator = TransitionCoordinator::new(timing(false));
        coordinator.begin(token("/"), Direction::Undirected).expect("begin");
        coordinator.begin(token("/"), Direction::Forward).expect("begin");
        assert_eq!(coordinator.phase(), Phase::Steady);
        assert_eq!(coordinator.mounted().len(), 1);
    }

    #[test]
    fn noop_listener_retains_exited_views() {
        let mut coordinator = TransitionCoordinator::new(timing(false));
        assert_eq!(coordinator.timing_props(), TimingProps::NoopEndListener);

        coordinator.begin(token("/"), Direction::Undirected).expect("begin");
        coordinator.begin(token("/a"), Direction::Forward).expect("begin");

        let mounted = coordinator.mounted();
        assert_eq!(mounted.len(), 2);
        assert_eq!(mounted[0].classes, vec!["forward-enter", "forward-enter-active"]);
        assert_eq!(mounted[1].role, ViewRole::Retained);
        assert_eq!(mounted[1].classes, vec!["forward-exit", "forward-exit-active"]);
        assert_eq!(coordinator.pending_timers(), 0);
        assert!(coordinator.poll_exits().is_empty());
    }

    #[test]
    fn earlier_exit_keeps_its_direction() {
        let mut coordinator = TransitionCoordinator::new(timing(false));
        coordinator.begin(token("/"), Direction::Undirected).expect("begin");
        coordinator.begin(token("/a"), Direction::Forward).expect("begin");
        coordinator.begin(token("/b"), Direction::Back).expect("begin");

        let mounted = coordinator.mounted();
        let root = mounted
            .iter()
            .find(|view| view.token == token("/"))
            .expect("root still mounted");
        assert_eq!(root.direction, Direction::Forward);
        let a = mounted
            .iter()
            .find(|view| view.token == token("/a"))
            .expect("a exiting");
        assert_eq!(a.direction, Direction::Back);
        assert_eq!(mounted[0].classes, vec!["back-enter", "back-enter-active"]);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_exit_unmounts_after_full_duration() {
        let mut coordinator = TransitionCoordinator::new(timing(true));
        assert_eq!(
            coordinator.timing_props(),
            TimingProps::Timeout(Duration::from_millis(200))
        );
        coordinator.begin(token("/"), Direction::Undirected).expect("begin");
        coordinator.begin(token("/a"), Direction::Forward).expect("begin");
        assert_eq!(coordinator.phase(), Phase::Transitioning);

        tokio::time::sleep(Duration::from_millis(199)).await;
        settle().await;
        assert!(coordinator.poll_exits().is_empty());
        assert_eq!(coordinator.mounted().len(), 2);

        tokio::time::sleep(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(coordinator.poll_exits(), vec![token("/")]);
        assert_eq!(coordinator.phase(), Phase::Steady);
        assert!(coordinator.mounted()[0].classes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reentered_token_ignores_its_stale_timer() {
        let mut coordinator = TransitionCoordinator::new(timing(true));
        coordinator.begin(token("/"), Direction::Undirected).expect("begin");
        coordinator.begin(token("/a"), Direction::Forward).expect("begin");
        tokio::time::sleep(Duration::from_millis(50)).await;
        coordinator.begin(token("/"), Direction::Back).expect("begin");

        assert_eq!(coordinator.next_exit().await, Some(token("/a")));
        assert_eq!(coordinator.current_token(), Some(&token("/")));
        assert_eq!(coordinator.phase(), Phase::Steady);
        assert_eq!(coordinator.next_exit().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_exits() {
        let mut coordinator = TransitionCoordinator::new(timing(true));
        coordinator.begin(token("/"), Direction::Undirected).expect("begin");
        coordinator.begin(token("/a"), Direction::Forward).expect("begin");
        coordinator.teardown();

        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;
        assert!(coordinator.poll_exits().is_empty());
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.pending_timers(), 0);
    }
}
