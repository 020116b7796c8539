//! 文件读写
//!
//! - 读取 `<input type="file">` 选中的文件
//! - 将下载到的字节交给浏览器保存

use grievance_portal::FilePayload;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Event, File, HtmlAnchorElement, HtmlInputElement, Url};

/// 取出事件目标上选中的第一个文件
pub fn selected_file(ev: &Event) -> Option<File> {
    let input: HtmlInputElement = ev.target()?.dyn_into().ok()?;
    input.files()?.get(0)
}

/// 读取文件内容
pub async fn read_file(file: &File) -> Result<FilePayload, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };
    Ok(FilePayload::new(file.name(), content_type, bytes))
}

pub fn bytes_to_blob(bytes: &[u8], content_type: &str) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let bag = BlobPropertyBag::new();
    bag.set_type(content_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
}

/// 通过临时 `<a download>` 触发浏览器保存
pub fn save_bytes(bytes: &[u8], content_type: &str, filename: &str) -> Result<(), JsValue> {
    let blob = bytes_to_blob(bytes, content_type)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)
}
