pub mod scoping;
