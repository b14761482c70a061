pub mod yaml_environment_provider;
