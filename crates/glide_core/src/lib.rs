//! glide core
//!
//! Foundational primitives shared by the glide crates:
//!
//! - **Values**: the scalar/string [`Value`] an animated property holds and the
//!   [`Target`] shape (single value or keyframe sequence) it animates towards
//! - **Observables**: explicit publish/subscribe cells with teardown handles
//! - **Completions**: one-shot settle signals and a join barrier over many
//!
//! # Example
//!
//! ```rust
//! use glide_core::{Completion, Observable};
//!
//! let flag = Observable::new(false);
//! let sub = flag.subscribe(|v| println!("animating: {v}"));
//! flag.set(true);
//! sub.unsubscribe();
//!
//! let a = Completion::pending();
//! let b = Completion::pending();
//! let all = Completion::join([a.clone(), b.clone()]);
//! a.settle();
//! b.settle();
//! assert!(all.is_settled());
//! ```

pub mod completion;
pub mod error;
pub mod observable;
pub mod value;

pub use completion::Completion;
pub use error::{MotionError, Result};
pub use observable::{Observable, Subscription, Subscriptions};
pub use value::{parse_float, Target, Value};
