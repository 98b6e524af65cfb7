pub mod check;
pub mod eval;
pub mod permissions;
pub mod roles;
