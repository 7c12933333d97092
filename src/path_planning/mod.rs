// Path Planning algorithms module

pub mod chain_lattice;
pub mod env_a_star;

pub use chain_lattice::*;
pub use env_a_star::*;
