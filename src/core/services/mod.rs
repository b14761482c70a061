pub mod env_resolver;
pub mod expression;
pub mod placeholder;
pub mod placeholder_resolver;
pub mod properties_provider;
pub mod property_collector;
pub mod special_keys;

#[cfg(test)]
pub mod test_support;
