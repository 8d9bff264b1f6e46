pub mod allocate;
pub mod classify;
pub mod rate;
pub mod reduce;
pub mod run;
