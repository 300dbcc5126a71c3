use serde_json::Value;

/// Placeholder shown when extraction yields no content.
pub const EMPTY_RESULT_PLACEHOLDER: &str = "No content returned.";

/// One element of a `content` block array. Blocks without a string `text`
/// field contribute an empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub text: Option<String>,
}

/// Recognized shapes of a completed job's result payload.
///
/// The backend enforces no schema on results, so classification is a
/// precedence-ordered probe over the raw JSON; the first matching shape wins.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    /// The payload is itself a markdown string.
    Text(String),
    /// Object carrying the markdown in a truthy `output_value` field.
    OutputValue(Value),
    /// Object carrying a `content` array of text blocks.
    ContentBlocks(Vec<ContentBlock>),
    /// Object carrying the markdown in a truthy `text` field.
    TextField(Value),
    /// Anything else; displayed as pretty-printed JSON.
    Opaque(Value),
}

impl ResultPayload {
    /// Classifies a raw payload; precedence mirrors display priority.
    pub fn classify(value: Value) -> Self {
        if let Value::String(text) = value {
            return ResultPayload::Text(text);
        }
        if let Value::Object(ref object) = value {
            if let Some(output) = object.get("output_value") {
                if is_truthy(output) {
                    return ResultPayload::OutputValue(output.clone());
                }
            }
            if let Some(Value::Array(blocks)) = object.get("content") {
                let blocks = blocks
                    .iter()
                    .map(|block| ContentBlock {
                        text: block
                            .get("text")
                            .and_then(Value::as_str)
                            .map(ToOwned::to_owned),
                    })
                    .collect();
                return ResultPayload::ContentBlocks(blocks);
            }
            if let Some(text) = object.get("text") {
                if is_truthy(text) {
                    return ResultPayload::TextField(text.clone());
                }
            }
        }
        ResultPayload::Opaque(value)
    }

    /// Extracts the displayable markdown for the payload.
    pub fn display_text(&self) -> String {
        let text = match self {
            ResultPayload::Text(text) => text.clone(),
            ResultPayload::OutputValue(value) => value_as_text(value),
            ResultPayload::ContentBlocks(blocks) => blocks
                .iter()
                .map(|block| block.text.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\n"),
            ResultPayload::TextField(value) => value_as_text(value),
            ResultPayload::Opaque(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        };
        if text.trim().is_empty() {
            EMPTY_RESULT_PLACEHOLDER.to_string()
        } else {
            text
        }
    }
}

/// Derives the display text for a completed job, if it carried a payload.
pub fn extract_display_text(payload: Option<Value>) -> String {
    match payload {
        Some(value) => ResultPayload::classify(value).display_text(),
        None => EMPTY_RESULT_PLACEHOLDER.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
