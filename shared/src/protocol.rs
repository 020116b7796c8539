use crate::{Credentials, Grievance, GrievancePatch, NewGrievance, TokenResponse};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for a JSON endpoint.
///
/// The request value itself is the JSON body when `HAS_BODY` is set; path
/// parameters are marked `#[serde(skip)]`.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request value is sent as the JSON body.
    const HAS_BODY: bool;
    /// The URL path, relative to the API base.
    fn path(&self) -> String;
}

// =========================================================
// Request Definitions
// =========================================================

/// Register a new account
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a>(pub &'a Credentials);

impl ApiRequest for RegisterRequest<'_> {
    // 201 with the created user, the body is not needed by the client.
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;
    fn path(&self) -> String {
        format!("{}/auth/register", crate::API_PREFIX)
    }
}

/// Exchange credentials for an access token
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a>(pub &'a Credentials);

impl ApiRequest for LoginRequest<'_> {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;
    fn path(&self) -> String {
        format!("{}/auth/login", crate::API_PREFIX)
    }
}

/// Create a grievance
#[derive(Debug, Serialize)]
pub struct CreateGrievanceRequest<'a>(pub &'a NewGrievance);

impl ApiRequest for CreateGrievanceRequest<'_> {
    type Response = Grievance;
    const METHOD: HttpMethod = HttpMethod::Post;
    const HAS_BODY: bool = true;
    fn path(&self) -> String {
        format!("{}/grievances/", crate::API_PREFIX)
    }
}

/// List the grievances visible to the caller
#[derive(Debug, Serialize)]
pub struct ListGrievancesRequest;

impl ApiRequest for ListGrievancesRequest {
    type Response = Vec<Grievance>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const HAS_BODY: bool = false;
    fn path(&self) -> String {
        format!("{}/grievances/", crate::API_PREFIX)
    }
}

/// Fetch one grievance with its detail fields
#[derive(Debug, Serialize)]
pub struct GetGrievanceRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for GetGrievanceRequest {
    type Response = Grievance;
    const METHOD: HttpMethod = HttpMethod::Get;
    const HAS_BODY: bool = false;
    fn path(&self) -> String {
        format!("{}/grievances/{}", crate::API_PREFIX, self.id)
    }
}

/// Partially update a grievance
#[derive(Debug, Serialize)]
pub struct UpdateGrievanceRequest<'a> {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub patch: &'a GrievancePatch,
}

impl ApiRequest for UpdateGrievanceRequest<'_> {
    type Response = Grievance;
    const METHOD: HttpMethod = HttpMethod::Patch;
    const HAS_BODY: bool = true;
    fn path(&self) -> String {
        format!("{}/grievances/{}", crate::API_PREFIX, self.id)
    }
}

/// Delete an uploaded file (204 on success)
#[derive(Debug, Serialize)]
pub struct DeleteFileRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteFileRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const HAS_BODY: bool = false;
    fn path(&self) -> String {
        format!("{}/files/{}", crate::API_PREFIX, self.id)
    }
}

/// Multipart upload endpoint
pub fn upload_path() -> String {
    format!("{}/files/upload", crate::API_PREFIX)
}

/// Raw file download endpoint
pub fn download_path(id: i64) -> String {
    format!("{}/files/{}", crate::API_PREFIX, id)
}
