//! Built-in vendor profiles.

pub mod cisco_catos;
pub mod cisco_ios;
pub mod enterasys;
pub mod h3c_comware;
