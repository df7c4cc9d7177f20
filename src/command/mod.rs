mod read;
mod run;

pub use read::read;
pub use run::run;
