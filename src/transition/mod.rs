mod coordinator;
mod timer;

pub use coordinator::{
    MountedView, Phase, Timing, TimingProps, TransitionCoordinator, TransitionToken, ViewRole,
};
