//! 表单校验
//!
//! 所有校验都在发起网络请求之前完成。

use crate::request::FilePayload;
use grievance_shared::{Category, DEPARTMENTS, NewGrievance};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

/// 表单错误，`Display` 即界面上显示的文案
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be at most 255 characters")]
    TitleTooLong,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Unknown department")]
    UnknownDepartment,
    #[error("Allowed: PDF, PNG, JPG. Max 5MB")]
    AttachmentType,
    #[error("Attachment exceeds the 5MB limit")]
    AttachmentTooLarge,
}

// =========================================================
// 登录 / 注册
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// 返回去除首尾空白的邮箱
    pub fn validate(&self) -> Result<&str, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::EmailRequired);
        }
        if self.password.is_empty() {
            return Err(FormError::PasswordRequired);
        }
        Ok(email)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<&str, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::EmailRequired);
        }
        if self.password.is_empty() {
            return Err(FormError::PasswordRequired);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok(email)
    }
}

// =========================================================
// 申诉草稿
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrievanceDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub dept_id: Option<i64>,
    pub attachment: Option<FilePayload>,
}

impl GrievanceDraft {
    /// 校验并生成请求体
    pub fn validate(&self) -> Result<NewGrievance, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(FormError::TitleTooLong);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FormError::DescriptionRequired);
        }
        if let Some(id) = self.dept_id
            && !DEPARTMENTS.iter().any(|d| d.id == id)
        {
            return Err(FormError::UnknownDepartment);
        }
        if let Some(file) = &self.attachment {
            validate_attachment(file)?;
        }

        Ok(NewGrievance {
            title: title.to_string(),
            description: description.to_string(),
            category: self.category.clone(),
            dept_id: self.dept_id,
        })
    }
}

/// 附件类型与大小检查
pub fn validate_attachment(file: &FilePayload) -> Result<(), FormError> {
    let allowed = file
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(FormError::AttachmentType);
    }
    if file.size() > MAX_ATTACHMENT_BYTES {
        return Err(FormError::AttachmentTooLarge);
    }
    Ok(())
}

/// `<select>` 中的院系值：空字符串表示未选择
pub fn parse_department(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> GrievanceDraft {
        GrievanceDraft {
            title: "Leaky roof".into(),
            description: "Water drips onto my desk in room 204.".into(),
            category: Category::Hostel,
            dept_id: Some(3),
            attachment: None,
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm { email: "  ".into(), password: "x".into() };
        assert_eq!(form.validate(), Err(FormError::EmailRequired));
        let form = LoginForm { email: " a@b.c ".into(), password: String::new() };
        assert_eq!(form.validate(), Err(FormError::PasswordRequired));
        let form = LoginForm { email: " a@b.c ".into(), password: "pw".into() };
        assert_eq!(form.validate(), Ok("a@b.c"));
    }

    #[test]
    fn register_rules() {
        let mut form = RegisterForm {
            email: "new@college.edu".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Passwords do not match");

        form.password = "abc".into();
        form.confirm_password = "abc".into();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );

        form.password = "secret1".into();
        form.confirm_password = "secret1".into();
        assert_eq!(form.validate(), Ok("new@college.edu"));
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut d = draft();
        d.title = String::new();
        assert_eq!(d.validate(), Err(FormError::TitleRequired));
        d.title = "   ".into();
        assert_eq!(d.validate(), Err(FormError::TitleRequired));
    }

    #[test]
    fn title_length_limit() {
        let mut d = draft();
        d.title = "a".repeat(MAX_TITLE_LEN);
        assert!(d.validate().is_ok());
        d.title.push('a');
        assert_eq!(d.validate(), Err(FormError::TitleTooLong));
    }

    #[test]
    fn valid_draft_builds_body() {
        let body = draft().validate().unwrap();
        assert_eq!(body.title, "Leaky roof");
        assert_eq!(body.category, Category::Hostel);
        assert_eq!(body.dept_id, Some(3));
    }

    #[test]
    fn department_must_be_known() {
        let mut d = draft();
        d.dept_id = Some(99);
        assert_eq!(d.validate(), Err(FormError::UnknownDepartment));
        d.dept_id = None;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn attachment_policy() {
        let mut d = draft();
        d.attachment = Some(FilePayload::new("notes.docx", "application/msword", vec![0; 10]));
        assert_eq!(d.validate(), Err(FormError::AttachmentType));

        d.attachment = Some(FilePayload::new("scan.PDF", "application/pdf", vec![0; 10]));
        assert!(d.validate().is_ok());

        d.attachment = Some(FilePayload::new(
            "photo.jpg",
            "image/jpeg",
            vec![0; MAX_ATTACHMENT_BYTES + 1],
        ));
        assert_eq!(d.validate(), Err(FormError::AttachmentTooLarge));
    }

    #[test]
    fn department_select_values() {
        assert_eq!(parse_department(""), None);
        assert_eq!(parse_department("3"), Some(3));
    }
}
