mod clock;
mod engine;
mod mode;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{AdvancePolicy, TickLease, TimerEngine, TimerState};
pub use mode::{Mode, SESSIONS_PER_CYCLE};
