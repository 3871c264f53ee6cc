use std::os::raw::c_char;

use lexa_metrics::{EngineConfig, MetricsEngine};

use crate::marshal::{cstring_to_str, deserialize_json, to_json};
use crate::result::LexaResult;

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a `LexaResult` that was returned by any `lexa_*` function.
///
/// Passing a null pointer is a no-op.
///
/// # Safety
///
/// `ptr` must be either null or a valid pointer that was previously returned
/// by one of the `lexa_*` functions and has not yet been freed.
#[no_mangle]
pub unsafe extern "C" fn lexa_free(ptr: *mut LexaResult) {
    LexaResult::free(ptr);
}

// ---------------------------------------------------------------------------
// Engine construction
// ---------------------------------------------------------------------------

/// Build an engine from an `EngineConfig` JSON object (`"{}"` or `""` for
/// defaults).
fn engine_from_options(options: &str) -> Result<MetricsEngine, String> {
    let config: EngineConfig =
        deserialize_json(options).map_err(|e| format!("failed to parse options: {}", e))?;
    MetricsEngine::new(config).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Corpus analysis
// ---------------------------------------------------------------------------

/// Measure the corpus file at `path`.
///
/// `path`         — null-terminated UTF-8 path of the corpus JSON file.
/// `options_json` — null-terminated UTF-8 `EngineConfig` object, e.g.
///                  `{"metrics":["mtld"],"mtld_threshold":0.7}`.
///
/// Returns a `LexaResult` whose `data` field is a `CorpusReport` JSON
/// object. An unreadable corpus still yields `ok = true`: the report's
/// `error` member describes the failure and its metric reports are empty.
/// `ok = false` is reserved for bad arguments and invalid options.
///
/// The returned pointer must be freed with `lexa_free`.
///
/// # Safety
///
/// Both pointer arguments must be valid, non-null, null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn lexa_analyze(
    path: *const c_char,
    options_json: *const c_char,
) -> *mut LexaResult {
    let path = match cstring_to_str(path) {
        Ok(s) => s,
        Err(e) => return LexaResult::failure(&e),
    };
    let options = match cstring_to_str(options_json) {
        Ok(s) => s,
        Err(e) => return LexaResult::failure(&e),
    };

    let engine = match engine_from_options(&options) {
        Ok(engine) => engine,
        Err(e) => return LexaResult::failure(&e),
    };

    let report = engine.run_path(&path);

    match to_json(&report) {
        Ok(json_out) => LexaResult::success(&json_out),
        Err(e) => LexaResult::failure(&format!("failed to serialize CorpusReport: {}", e)),
    }
}

// ---------------------------------------------------------------------------
// Single text
// ---------------------------------------------------------------------------

/// Measure one free text with every metric.
///
/// Returns a `LexaResult` whose `data` field is a `TextMeasurement` JSON
/// object on success. Only `mtld_threshold` is read from `options_json`.
///
/// The returned pointer must be freed with `lexa_free`.
///
/// # Safety
///
/// Both pointer arguments must be valid, non-null, null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn lexa_measure_text(
    text: *const c_char,
    options_json: *const c_char,
) -> *mut LexaResult {
    let text = match cstring_to_str(text) {
        Ok(s) => s,
        Err(e) => return LexaResult::failure(&e),
    };
    let options = match cstring_to_str(options_json) {
        Ok(s) => s,
        Err(e) => return LexaResult::failure(&e),
    };

    let engine = match engine_from_options(&options) {
        Ok(engine) => engine,
        Err(e) => return LexaResult::failure(&e),
    };

    match to_json(&engine.measure_text(&text)) {
        Ok(json_out) => LexaResult::success(&json_out),
        Err(e) => LexaResult::failure(&format!("failed to serialize TextMeasurement: {}", e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
