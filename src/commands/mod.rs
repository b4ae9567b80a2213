mod check;
mod clean;
mod convert;

pub use check::check;
pub use clean::clean;
pub use convert::convert;
