#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod descent;
mod newton;
mod surface;

pub use descent::{learning_rate_from_slider, DescentConfig, GradientDescent};
pub use newton::NewtonDescent;
pub use surface::LossSurface;
