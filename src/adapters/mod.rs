pub mod environments;
pub mod parsers;
pub mod tree;
