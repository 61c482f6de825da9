//! jianpu: numbered-notation (jianpu) layout and typesetting engine.
//!
//! Takes a sheet document (notes, rests and tuplets plus index-anchored
//! key, time signature and tempo annotations) and lays it out into rows of
//! positioned drawing primitives, ready for any painter. An SVG painter is
//! included.
//!
//! # Example
//! ```no_run
//! use jianpu::{parse_sheet, render, Options, RenderSheet};
//!
//! let sheet = parse_sheet(&std::fs::read_to_string("song.json").unwrap()).unwrap();
//! let mut sheet = RenderSheet::from(sheet);
//! let result = render(&mut sheet, &Options::default()).unwrap();
//! println!("Items: {}", result.items.len());
//! for log in &result.logs {
//!     println!("{}: {}", log.index, log.message);
//! }
//! ```

pub mod error;
pub mod model;
pub mod renderer;

#[cfg(target_os = "android")]
pub mod android;

pub use error::{Error, Result};
pub use model::*;
pub use renderer::{
    paint_all, render, render_to_svg, repaint_notation, BoundingBox, Log, Painter, RenderItem,
    RenderNotation, RenderResult, RenderSheet, Severity, SvgPainter,
};

/// Parse a sheet document from JSON.
pub fn parse_sheet(json: &str) -> Result<Sheet> {
    Ok(serde_json::from_str(json)?)
}

/// Convert a sheet to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn sheet_to_json(sheet: &Sheet) -> Result<String> {
    Ok(serde_json::to_string_pretty(sheet)?)
}

/// Parse layout options from JSON. Missing fields take their defaults.
pub fn parse_options(json: &str) -> Result<Options> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON sheet and render it directly to SVG.
///
/// `options` is an optional JSON options object; `None` uses the defaults.
pub fn render_json_to_svg(sheet_json: &str, options: Option<&str>) -> Result<String> {
    let options = match options {
        Some(json) => parse_options(json)?,
        None => Options::default(),
    };
    let mut sheet = RenderSheet::from(parse_sheet(sheet_json)?);
    render_to_svg(&mut sheet, &options)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Render a JSON sheet and return SVG as a C string.
/// The caller must free the returned string with `jianpu_free_string`.
///
/// `options` may be null to use the default options. Returns null on any
/// parse or validation error.
///
/// # Safety
/// `sheet` must be a valid null-terminated UTF-8 C string. `options` must be
/// null or a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn jianpu_render_json(
    sheet: *const c_char,
    options: *const c_char,
) -> *mut c_char {
    if sheet.is_null() {
        return std::ptr::null_mut();
    }
    let sheet_json = match unsafe { CStr::from_ptr(sheet) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };
    let options_json = if options.is_null() {
        None
    } else {
        match unsafe { CStr::from_ptr(options) }.to_str() {
            Ok(s) => Some(s),
            Err(_) => return std::ptr::null_mut(),
        }
    };

    match render_json_to_svg(sheet_json, options_json) {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(e) => {
            log::error!("jianpu_render_json: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by jianpu functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a jianpu function, or null.
#[no_mangle]
pub unsafe extern "C" fn jianpu_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
