pub mod clock;
pub mod events;
pub mod reminders;
pub mod timer;

pub use clock::Clock;
pub use events::EngineEvent;
pub use timer::TimerEngine;
