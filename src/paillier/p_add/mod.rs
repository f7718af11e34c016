pub mod p_add;

pub use p_add::p_add;
