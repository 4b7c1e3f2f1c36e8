pub mod assess;
pub mod delegate;
pub mod git_gate;

pub use assess::{AssessCommands, handle_assess_command};
pub use delegate::delegate_to_juju_ci;
pub use git_gate::handle_git_gate_command;
