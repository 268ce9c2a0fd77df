pub mod cone;
pub mod run;
pub mod samples;
pub mod walk;
