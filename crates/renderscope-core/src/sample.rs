//! Single render observations.

use serde::Serialize;
use serde_json::Value;

/// Stored in place of props that could not be converted to JSON.
pub const UNSERIALIZABLE_PROPS: &str = "[unserializable props]";

/// One observed render of a named component.
///
/// Samples are folded into the aggregation store as soon as they are taken
/// and never kept individually.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Name of the component that rendered
    pub component_name: String,
    /// Clock reading at the time of the render
    pub timestamp_ms: f64,
    /// JSON snapshot of the component's props, if any were supplied
    pub props: Option<Value>,
}

impl Sample {
    /// Create a sample without props.
    pub fn new(component_name: impl Into<String>, timestamp_ms: f64) -> Self {
        Self {
            component_name: component_name.into(),
            timestamp_ms,
            props: None,
        }
    }

    /// Attach a sanitized props snapshot.
    #[must_use]
    pub fn with_props<P: Serialize + ?Sized>(mut self, props: &P) -> Self {
        self.props = Some(sanitize_props(props));
        self
    }
}

/// Convert props to JSON, substituting [`UNSERIALIZABLE_PROPS`] on failure.
pub fn sanitize_props<P: Serialize + ?Sized>(props: &P) -> Value {
    match serde_json::to_value(props) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%err, "render props could not be serialized");
            Value::String(UNSERIALIZABLE_PROPS.to_string())
        }
    }
}
