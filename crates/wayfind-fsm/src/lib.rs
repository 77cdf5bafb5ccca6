//! **wayfind-fsm**: a table-driven finite state machine.
//!
//! States live in an arena owned by [`FiniteStateMachine`] and are addressed
//! by [`StateId`] handles. Transitions are guarded edges to a target handle;
//! each tick the machine evaluates its universal transitions, then the
//! current state's own transitions, switches state on the first one that
//! holds, and finally lets the current state act.
//!
//! ```
//! use std::rc::Rc;
//! use wayfind_core::Diagnostics;
//! use wayfind_fsm::{FiniteStateMachine, FsmState, Transition};
//!
//! struct Counter(&'static str);
//!
//! impl FsmState<i32> for Counter {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//!     fn perform_action(&mut self, ctx: &mut i32) {
//!         *ctx += 1;
//!     }
//! }
//!
//! let mut fsm = FiniteStateMachine::new(Diagnostics::new());
//! let low = fsm.add_state(Counter("low")).unwrap();
//! let high = fsm.add_state(Counter("high")).unwrap();
//! fsm.add_transition(low, Transition::new(high, |n: &i32| *n >= 3)).unwrap();
//! fsm.add_universal_transition(Rc::new(Transition::new(low, |n: &i32| *n > 10)));
//!
//! let mut n = 0;
//! fsm.set_current_state(low, &mut n).unwrap();
//! for _ in 0..4 {
//!     fsm.tick(&mut n);
//! }
//! assert_eq!(fsm.current_state(), Some(high));
//! ```

mod machine;
mod state;
mod transition;

pub use machine::{FiniteStateMachine, FsmError};
pub use state::{FsmState, StateId};
pub use transition::Transition;
