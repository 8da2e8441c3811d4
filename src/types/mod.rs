mod browser;
mod links;
mod prompt;

pub use browser::*;
pub use links::*;
pub use prompt::*;
