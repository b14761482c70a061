pub mod component_tree;
pub mod environment_provider;
pub mod parser;
pub mod special_key;
