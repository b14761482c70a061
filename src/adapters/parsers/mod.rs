pub mod directives;
pub mod properties_parser;
pub mod yaml_parser;

use crate::core::traits::parser::ComponentParser;

/// Parsers for every supported format. The properties parser comes last
/// and reads any extension the others don't claim.
pub fn standard() -> Vec<Box<dyn ComponentParser>> {
    vec![
        Box::new(yaml_parser::YamlParser),
        Box::new(properties_parser::PropertiesParser),
    ]
}
