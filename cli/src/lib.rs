pub mod commands;
pub mod logging;
pub mod repl;
pub mod scenario;
pub mod simulator;
pub mod speech;
pub mod wording;

pub use repl::readline;
pub use scenario::Scenario;
pub use simulator::Simulator;
