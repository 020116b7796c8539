//! 学生申诉门户的共享数据模型
//!
//! 前端与客户端核心共用的线上（JSON）数据结构。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

pub mod date;
pub mod protocol;

pub use date::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const API_PREFIX: &str = "/api/v1";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_IDEMPOTENCY_KEY: &str = "Idempotency-Key";

// =========================================================
// 状态与分类 (Status & Category)
// =========================================================

/// 申诉状态
///
/// 服务端可能返回列表之外的状态（如 `submitted`），保留在 `Other` 中。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GrievanceStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    Other(String),
}

impl GrievanceStatus {
    pub const KNOWN: [GrievanceStatus; 4] = [
        GrievanceStatus::Open,
        GrievanceStatus::InProgress,
        GrievanceStatus::Resolved,
        GrievanceStatus::Closed,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Other(s) => s,
        }
    }

    pub fn from_label(s: &str) -> Self {
        match s {
            "Open" => Self::Open,
            "In Progress" => Self::InProgress,
            "Resolved" => Self::Resolved,
            "Closed" => Self::Closed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for GrievanceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for GrievanceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// 申诉分类
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Academic,
    Hostel,
    Infrastructure,
    Administration,
    Fees,
    Other,
    /// 列表之外的分类，原样保留
    Unlisted(String),
}

impl Category {
    pub const KNOWN: [Category; 6] = [
        Category::Academic,
        Category::Hostel,
        Category::Infrastructure,
        Category::Administration,
        Category::Fees,
        Category::Other,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Academic => "Academic",
            Self::Hostel => "Hostel",
            Self::Infrastructure => "Infrastructure",
            Self::Administration => "Administration",
            Self::Fees => "Fees",
            Self::Other => "Other",
            Self::Unlisted(s) => s,
        }
    }

    pub fn from_label(s: &str) -> Self {
        match s {
            "Academic" => Self::Academic,
            "Hostel" => Self::Hostel,
            "Infrastructure" => Self::Infrastructure,
            "Administration" => Self::Administration,
            "Fees" => Self::Fees,
            "Other" => Self::Other,
            other => Self::Unlisted(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// 可选院系（与服务端种子数据一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Department {
    pub id: i64,
    pub name: &'static str,
}

pub const DEPARTMENTS: [Department; 4] = [
    Department { id: 1, name: "Computer Science" },
    Department { id: 2, name: "Examination" },
    Department { id: 3, name: "Hostel" },
    Department { id: 4, name: "Finance" },
];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 审计记录，由服务端生成，只追加
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    #[serde(default, alias = "remarks")]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, alias = "timestamp")]
    pub created_at: Option<Timestamp>,
}

/// 已上传文件的元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// 申诉附件：文件元数据或仅文件名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attachment {
    File(UploadResult),
    Name(String),
}

impl Attachment {
    /// 可用于下载接口的文件 ID
    pub fn file_id(&self) -> Option<i64> {
        match self {
            Self::File(f) => Some(f.id),
            Self::Name(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::File(f) => &f.filename,
            Self::Name(n) => n,
        }
    }
}

/// 申诉记录
///
/// 创建后只由服务端修改；详情接口会额外附带院系名、附件和审计历史。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grievance {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub status: GrievanceStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dept_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audits: Vec<AuditEntry>,
}

impl Grievance {
    pub fn category_label(&self) -> &str {
        self.category.as_ref().map(Category::label).unwrap_or("N/A")
    }
}

/// 当前用户的展示信息
///
/// 来自令牌载荷（未经验证），只用于界面展示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl UserSummary {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_admin: false,
            claims: Map::new(),
        }
    }

    /// 令牌主体（`sub`）
    pub fn subject(&self) -> Option<String> {
        match self.claims.get("sub")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// =========================================================
// 请求 / 响应体 (Bodies)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// 新建申诉的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGrievance {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub dept_id: Option<i64>,
}

/// 部分更新（PATCH）请求体，未设置的字段不会被发送
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrievancePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GrievanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_id: Option<i64>,
}

impl GrievancePatch {
    pub fn status(status: GrievanceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_keeps_unknown_labels() {
        let list: Vec<GrievanceStatus> =
            serde_json::from_value(json!(["Open", "In Progress", "submitted"])).unwrap();
        assert_eq!(
            list,
            vec![
                GrievanceStatus::Open,
                GrievanceStatus::InProgress,
                GrievanceStatus::Other("submitted".to_string())
            ]
        );
        assert_eq!(json!(GrievanceStatus::InProgress), json!("In Progress"));
    }

    #[test]
    fn grievance_detail_decodes_optional_parts() {
        let g: Grievance = serde_json::from_value(json!({
            "id": 42,
            "title": "Leaky roof",
            "category": "Hostel",
            "status": "Open",
            "description": "Water everywhere",
            "dept_id": 3,
            "department_name": "Hostel",
            "created_at": "2024-05-02T08:00:00",
            "attachment": { "id": 7, "filename": "roof.jpg", "file_size": 1024, "content_type": "image/jpeg" },
            "audits": [
                { "id": 1, "note": "Created", "created_at": "2024-05-02T08:00:00Z" },
                { "id": 2, "remarks": "Assigned to warden", "timestamp": "2024-05-03T09:00:00Z" }
            ]
        }))
        .unwrap();

        assert_eq!(g.category, Some(Category::Hostel));
        assert_eq!(g.attachment.as_ref().and_then(Attachment::file_id), Some(7));
        assert_eq!(g.audits[1].note, "Assigned to warden");
        assert_eq!(g.audits[0].id, 1);
    }

    #[test]
    fn grievance_list_entry_tolerates_missing_fields() {
        let g: Grievance = serde_json::from_value(json!({
            "id": 1, "title": "t", "category": null, "status": "submitted", "student_id": 5
        }))
        .unwrap();
        assert_eq!(g.category_label(), "N/A");
        assert!(g.audits.is_empty());
        assert!(g.created_at.is_none());
    }

    #[test]
    fn patch_only_sends_set_fields() {
        let patch = GrievancePatch::status(GrievanceStatus::Resolved);
        assert_eq!(json!(patch), json!({ "status": "Resolved" }));
    }

    #[test]
    fn user_summary_round_trips_extra_claims() {
        let user: UserSummary = serde_json::from_value(json!({
            "email": "student@college.edu", "is_admin": false, "sub": "12", "exp": 1700000000
        }))
        .unwrap();
        assert_eq!(user.subject().as_deref(), Some("12"));
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["exp"], json!(1700000000));
        assert_eq!(back["email"], json!("student@college.edu"));
    }
}
