//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::render_json_to_svg;

/// Render a JSON sheet to SVG.
///
/// Called from Kotlin as:
///   external fun renderJson(sheet: String, options: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_jianpu_JianpuLib_renderJson(
    mut env: JNIEnv,
    _class: JClass,
    sheet: JString,
    options: JString,
) -> jstring {
    let sheet_json: String = match env.get_string(&sheet) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let options_json: Option<String> = if options.is_null() {
        None
    } else {
        env.get_string(&options).ok().map(|s| s.into())
    };

    match render_json_to_svg(&sheet_json, options_json.as_deref()) {
        Ok(svg) => match env.new_string(&svg) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            log::error!("renderJson: {e}");
            std::ptr::null_mut()
        }
    }
}
