use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct EngineError {
    message: String,
}

#[derive(Serialize)]
struct WrapResult {
    lines: Vec<String>,
    warnings: Vec<tabtext::TabWarning>,
}

fn error_to_js(message: impl ToString) -> JsValue {
    let error = EngineError {
        message: message.to_string(),
    };
    JsValue::from_str(
        &serde_json::to_string(&error).unwrap_or_else(|_| r#"{"message":"unknown error"}"#.to_string()),
    )
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(error_to_js)
}

/// Annotate markup with transposed chord names and return blocks, chords and
/// warnings as JSON. Unknown chord roots are reported in `warnings`
#[wasm_bindgen]
pub fn annotate(markup: &str, transpose: i32) -> Result<String, JsValue> {
    to_json(&tabtext::annotate_transposed(markup, transpose))
}

/// Distinct chord names of a document in lexical order, as a JS array
#[wasm_bindgen]
pub fn chords(markup: &str, transpose: i32) -> Result<JsValue, JsValue> {
    let annotated = tabtext::annotate_transposed(markup, transpose);
    serde_wasm_bindgen::to_value(&annotated.chords.sorted()).map_err(error_to_js)
}

/// Transpose a single chord name; unknown names come back unchanged
#[wasm_bindgen]
pub fn transpose_chord(chord: &str, half_steps: i32) -> String {
    tabtext::transpose(chord, half_steps)
}

#[wasm_bindgen]
pub fn transpose_key_name(key: &str, half_steps: i32) -> String {
    tabtext::transpose_key_name(key, half_steps)
}

/// Wrap a chord line and its lyric line for a fixed-width grid.
/// Returns `{ lines, warnings }` as JSON
#[wasm_bindgen]
pub fn wrap_pair(chord_line: &str, lyric_line: Option<String>, width: usize) -> Result<String, JsValue> {
    let mut engine = tabtext::LineWrapEngine::new(width);
    let lines = engine.wrap_pair(chord_line, lyric_line.as_deref());
    to_json(&WrapResult {
        lines,
        warnings: engine.into_warnings(),
    })
}

/// Run the full pipeline with a YAML engine configuration (empty for defaults)
#[wasm_bindgen]
pub fn render(markup: &str, config_yaml: &str) -> Result<String, JsValue> {
    let config = tabtext::EngineConfig::from_yaml(config_yaml).map_err(error_to_js)?;
    to_json(&tabtext::render(markup, &config))
}

/// Monospace chord-over-lyric preview of a document
#[wasm_bindgen]
pub fn render_text(markup: &str, config_yaml: &str) -> Result<String, JsValue> {
    let config = tabtext::EngineConfig::from_yaml(config_yaml).map_err(error_to_js)?;
    Ok(tabtext::render_text(&tabtext::render(markup, &config)))
}

/// Chord marker placements per block on the configured fixed-width grid, as
/// JSON. Placement runs whatever `place-markers` says in the configuration
#[wasm_bindgen]
pub fn place(markup: &str, config_yaml: &str) -> Result<String, JsValue> {
    let mut config = tabtext::EngineConfig::from_yaml(config_yaml).map_err(error_to_js)?;
    config.place_markers = true;
    let rendered = tabtext::render(markup, &config);
    to_json(&rendered.placements.unwrap_or_default())
}
