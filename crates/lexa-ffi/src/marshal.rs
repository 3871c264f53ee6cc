use std::ffi::CStr;
use std::os::raw::c_char;

use serde::de::DeserializeOwned;

/// Serialize `value` to a JSON string.
pub fn to_json(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {}", e))
}

/// Parse `json` into `T`, treating an empty or whitespace-only string as an
/// empty JSON object so callers may pass `""` for defaults.
pub fn deserialize_json<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    let json = if json.trim().is_empty() { "{}" } else { json };
    serde_json::from_str(json).map_err(|e| format!("invalid JSON: {}", e))
}

/// Borrow the null-terminated C string at `ptr` and return it as an owned
/// `String`.
///
/// # Safety
///
/// `ptr` must be a valid, non-null pointer to a null-terminated UTF-8 string
/// that remains alive for the duration of this call.
///
/// Returns an error string if `ptr` is null or if the bytes are not valid
/// UTF-8.
pub unsafe fn cstring_to_str(ptr: *const c_char) -> Result<String, String> {
    if ptr.is_null() {
        return Err("received null pointer".to_string());
    }

    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| s.to_owned())
        .map_err(|e| format!("invalid UTF-8 in C string: {}", e))
}
