//! Weather forecast tool.
//!
//! A stub lookup: every location gets the same clear-sky forecast (`晴れ`).

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::tools::{ToolError, ToolOutput, ToolRegistry};

/// Parameters for the weather forecast tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherForecastParams {
    /// Location to get the forecast for, e.g. "東京".
    pub location: String,
}

/// Weather forecast tool - returns a forecast sentence for a location.
pub struct WeatherForecastTool;

impl WeatherForecastTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_weather_forecast";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "天気予報を取得します。\n例えば、\"東京の天気を教えて\" のように使用します。";

    #[instrument(skip_all, fields(location = %params.location))]
    pub fn execute(params: &WeatherForecastParams) -> String {
        info!("Weather forecast tool called");
        format!("{}の天気予報は晴れです。", params.location)
    }
}

/// Register the weather forecast tool.
pub fn register(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register_fn(
        WeatherForecastTool::NAME,
        WeatherForecastTool::DESCRIPTION,
        |params: WeatherForecastParams| Ok(ToolOutput::new(WeatherForecastTool::execute(&params))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn test_forecast_mentions_location() {
        let params = WeatherForecastParams {
            location: "Tokyo".to_string(),
        };
        assert_eq!(WeatherForecastTool::execute(&params), "Tokyoの天気予報は晴れです。");

        let params = WeatherForecastParams {
            location: "東京".to_string(),
        };
        assert_eq!(WeatherForecastTool::execute(&params), "東京の天気予報は晴れです。");
    }

    #[test]
    fn test_description_gives_usage_example() {
        assert!(WeatherForecastTool::DESCRIPTION.starts_with("天気予報を取得します。"));
        assert!(WeatherForecastTool::DESCRIPTION.contains("東京の天気を教えて"));
    }

    #[test]
    fn test_forecast_via_registry() {
        let mut registry = ToolRegistry::new();
        register(&mut registry).unwrap();

        let result = registry
            .call_tool(
                "get_weather_forecast",
                serde_json::json!({ "location": "Osaka" }),
            )
            .unwrap();

        let text = match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        };
        assert!(text.contains("Osaka"));
    }

    #[test]
    fn test_missing_location_is_invalid() {
        let mut registry = ToolRegistry::new();
        register(&mut registry).unwrap();

        let err = registry
            .call_tool("get_weather_forecast", serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
