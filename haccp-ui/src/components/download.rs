//! PDF downloads through a temporary object URL

use wasm_bindgen::JsCast;

use crate::api::Download;

/// Hand the bytes to the browser as a file named `download.filename`
pub fn save_download(download: &Download) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let array = js_sys::Uint8Array::from(download.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());
    let blob = web_sys::Blob::new_with_u8_array_sequence(&parts)
        .map_err(|_| "Cannot create file".to_string())?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Cannot create download link".to_string())?;

    let anchor = document
        .create_element("a")
        .ok()
        .and_then(|el| el.dyn_into::<web_sys::HtmlAnchorElement>().ok())
        .ok_or("Cannot create download link")?;
    anchor.set_href(&url);
    anchor.set_download(&download.filename);
    anchor.click();

    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}
