use std::ffi::CString;
use std::os::raw::c_char;

/// C-compatible result envelope for all FFI calls.
///
/// Both `data` and `error` are heap-allocated C strings owned by this struct.
/// The caller must free the entire envelope (including the inner strings) by
/// passing the pointer to `lexa_free`.
#[repr(C)]
pub struct LexaResult {
    /// `true` on success, `false` on failure.
    pub ok: bool,
    /// JSON payload on success; null pointer on failure.
    pub data: *mut c_char,
    /// Error message on failure; null pointer on success.
    pub error: *mut c_char,
}

impl LexaResult {
    /// Allocate a successful result whose data field holds `json`.
    ///
    /// Ownership of the returned pointer passes to the caller, who must
    /// eventually call `lexa_free`.
    pub fn success(json: &str) -> *mut Self {
        Box::into_raw(Box::new(LexaResult {
            ok: true,
            data: owned_cstring(json, "<payload contained a null byte>"),
            error: std::ptr::null_mut(),
        }))
    }

    /// Allocate a failure result whose error field holds `message`.
    ///
    /// Ownership of the returned pointer passes to the caller, who must
    /// eventually call `lexa_free`.
    pub fn failure(message: &str) -> *mut Self {
        Box::into_raw(Box::new(LexaResult {
            ok: false,
            data: std::ptr::null_mut(),
            error: owned_cstring(message, "<error message contained a null byte>"),
        }))
    }

    /// Reclaim ownership of the inner C strings and the struct itself.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a pointer produced by `LexaResult::success` or
    /// `LexaResult::failure` that has not been freed already.
    pub unsafe fn free(ptr: *mut Self) {
        if ptr.is_null() {
            return;
        }

        let result = Box::from_raw(ptr);

        if !result.data.is_null() {
            drop(CString::from_raw(result.data));
        }

        if !result.error.is_null() {
            drop(CString::from_raw(result.error));
        }
    }
}

/// Convert `text` into a raw owned C string, substituting `fallback` when
/// `text` contains an interior null byte.
fn owned_cstring(text: &str, fallback: &'static str) -> *mut c_char {
    CString::new(text)
        .or_else(|_| CString::new(fallback))
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}
