//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 文件选择后的读取与附件校验
//! - 数据到草稿对象的转换

use crate::web::file::read_file;
use grievance_portal::FilePayload;
use grievance_portal::forms::{GrievanceDraft, parse_department, validate_attachment};
use grievance_portal::shared::Category;
use leptos::prelude::*;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub category: RwSignal<Category>,
    /// `<select>` 原始值，空字符串表示未选择
    pub dept_id: RwSignal<String>,
    pub attachment: RwSignal<Option<FilePayload>>,
    pub attachment_error: RwSignal<Option<String>>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            category: RwSignal::new(Category::default()),
            dept_id: RwSignal::new(String::new()),
            attachment: RwSignal::new(None),
            attachment_error: RwSignal::new(None),
        }
    }

    /// 读取选中的文件，不合规的文件不会被保留
    pub async fn select_file(&self, file: Option<web_sys::File>) {
        self.attachment_error.set(None);
        let Some(file) = file else {
            self.attachment.set(None);
            return;
        };

        match read_file(&file).await {
            Ok(payload) => match validate_attachment(&payload) {
                Ok(()) => self.attachment.set(Some(payload)),
                Err(e) => {
                    self.attachment.set(None);
                    self.attachment_error.set(Some(e.to_string()));
                }
            },
            Err(e) => {
                log::warn!("reading {} failed: {:?}", file.name(), e);
                self.attachment.set(None);
                self.attachment_error.set(Some("Could not read the selected file".to_string()));
            }
        }
    }

    /// 将表单状态转换为草稿
    pub fn to_draft(&self) -> GrievanceDraft {
        GrievanceDraft {
            title: self.title.get(),
            description: self.description.get(),
            category: self.category.get(),
            dept_id: parse_department(&self.dept_id.get()),
            attachment: self.attachment.get(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
