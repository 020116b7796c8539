//! HTTP 请求封装模块
//!
//! 基于 `web_sys::fetch` 实现核心库的 `HttpClient`。
//! 响应体统一按字节读取，JSON 与文件下载共用一条路径。

use grievance_portal::request::{FormPart, HttpClient, HttpRequest, HttpResponse, RequestBody};
use grievance_portal::{ApiError, ApiResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

use super::file::bytes_to_blob;

fn js_error(e: JsValue) -> String {
    format!("{:?}", e)
}

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let headers = Headers::new()
            .map_err(|e| ApiError::Encode(format!("创建 Headers 失败: {}", js_error(e))))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ApiError::Encode(format!("设置 Header 失败: {}", js_error(e))))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
            // multipart 不设置 Content-Type，由浏览器生成 boundary
            Some(RequestBody::Multipart(parts)) => opts.set_body(&form_data(parts)?.into()),
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ApiError::Encode(js_error(e)))?;

        let window = web_sys::window().ok_or_else(|| ApiError::transport("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::transport(js_error(e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::Decode(format!("Response 类型转换失败: {}", js_error(e))))?;

        let status = response.status();
        let content_type = response.headers().get("Content-Type").ok().flatten();

        let promise = response
            .array_buffer()
            .map_err(|e| ApiError::Decode(js_error(e)))?;
        let buffer = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::transport(js_error(e)))?;
        let body = js_sys::Uint8Array::new(&buffer).to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn form_data(parts: &[FormPart]) -> ApiResult<FormData> {
    let form = FormData::new().map_err(|e| ApiError::Encode(js_error(e)))?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form.append_with_str(name, value),
            FormPart::File { name, file } => {
                let blob = bytes_to_blob(&file.bytes, &file.content_type)
                    .map_err(|e| ApiError::Encode(js_error(e)))?;
                form.append_with_blob_and_filename(name, &blob, &file.filename)
            }
        }
        .map_err(|e| ApiError::Encode(js_error(e)))?;
    }
    Ok(form)
}
