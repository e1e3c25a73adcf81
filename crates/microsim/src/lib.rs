#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use microsim_algebra as algebra;

#[doc(inline)]
pub use microsim_solve as solve;

#[doc(inline)]
pub use microsim_vision as vision;

#[doc(inline)]
pub use microsim_plan as plan;

#[doc(inline)]
pub use microsim_filter as filter;

#[doc(inline)]
pub use microsim_slam as slam;

#[doc(inline)]
pub use microsim_optim as optim;
