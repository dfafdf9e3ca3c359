pub mod import;
pub mod lessons;
pub mod register;
pub mod serve;
pub mod stats;
