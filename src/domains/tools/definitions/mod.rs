//! Tool definitions module.
//!
//! Each file in this directory is one tool module exposing
//! `register(&mut ToolRegistry)`. The loader scans this directory at startup
//! and resolves what it finds against [`catalog`].
//!
//! Adding a tool module: create `<name>.rs` here, declare it below, and add
//! it to the catalog.

pub mod math;
pub mod weather_forecast;

pub use math::{AddTool, BinaryOperands, MultiplyTool};
pub use weather_forecast::{WeatherForecastParams, WeatherForecastTool};

use super::discovery::ModuleCatalog;
use crate::core::config::DEFAULT_TOOLS_NAMESPACE;

/// Every tool module compiled into this server, under the default namespace.
pub fn catalog() -> ModuleCatalog {
    catalog_in(DEFAULT_TOOLS_NAMESPACE)
}

/// Every tool module compiled into this server, qualified under `namespace`.
pub fn catalog_in(namespace: &str) -> ModuleCatalog {
    ModuleCatalog::new(namespace)
        .with_module("math", math::register)
        .with_module("weather_forecast", weather_forecast::register)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_discovery_dir;
    use crate::domains::tools::{ToolLoader, ToolRegistry, scan_modules};

    #[test]
    fn test_every_source_module_is_catalogued() {
        let catalog = catalog();
        let modules = scan_modules(&default_discovery_dir()).unwrap();
        assert_eq!(modules, vec!["math", "weather_forecast"]);
        for module in modules {
            assert!(catalog.resolve(&format!("tools::{}", module)).is_some());
        }
    }

    #[test]
    fn test_discover_builtin_tools() {
        let loader = ToolLoader::for_catalog(catalog());
        let mut registry = ToolRegistry::new();
        loader
            .discover(&default_discovery_dir(), &mut registry)
            .unwrap();

        assert_eq!(
            registry.tool_names(),
            vec!["add", "get_weather_forecast", "multiply"]
        );
    }

    #[test]
    fn test_catalog_in_custom_namespace() {
        let catalog = catalog_in("plugins");
        assert_eq!(catalog.namespace(), "plugins");
        assert!(catalog.resolve("plugins::math").is_some());
        assert!(catalog.resolve("tools::math").is_none());

        let loader = ToolLoader::for_catalog(catalog);
        let mut registry = ToolRegistry::new();
        loader
            .discover(&default_discovery_dir(), &mut registry)
            .unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.loaded_modules(),
            vec!["plugins::math", "plugins::weather_forecast"]
        );
    }

    #[test]
    fn test_weather_forecast_after_discovery() {
        let loader = ToolLoader::for_catalog(catalog());
        let mut registry = ToolRegistry::new();
        loader
            .discover(&default_discovery_dir(), &mut registry)
            .unwrap();

        let result = registry
            .call_tool(
                WeatherForecastTool::NAME,
                serde_json::json!({ "location": "Tokyo" }),
            )
            .unwrap();
        let structured = result.structured_content.unwrap();
        assert!(structured["result"].as_str().unwrap().contains("Tokyo"));
    }
}
