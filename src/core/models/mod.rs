pub mod component;
pub mod config_type;
pub mod environment;
pub mod fragment;
pub mod layer_filter;
pub mod property;
