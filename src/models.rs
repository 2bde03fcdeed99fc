use serde::{Deserialize, Serialize};

use crate::schema::{Kitten, Testimonial};

/// Response type for the root endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response type for the `/test` diagnostic endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DiagnosticResponse {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Response type for successful document creation
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response type for inquiry submission
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct InquiryResponse {
    pub id: String,
    pub success: bool,
}

/// Query parameters for the kitten list endpoint
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KittenQuery {
    /// Case-insensitive substring of the color
    pub color: Option<String>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    /// Case-insensitive substring of the sex
    pub sex: Option<String>,
    /// Exact status, e.g. available
    pub status: Option<String>,
}

/// Query parameters for the testimonial list endpoint
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TestimonialQuery {
    /// Maximum number of testimonials to return (default 10)
    #[serde(default = "default_testimonial_limit")]
    pub limit: usize,
}

fn default_testimonial_limit() -> usize {
    10
}

/// Kitten record with its identifier
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KittenResponse {
    pub id: String,
    #[serde(flatten)]
    pub kitten: Kitten,
}

impl From<(String, Kitten)> for KittenResponse {
    fn from((id, kitten): (String, Kitten)) -> Self {
        KittenResponse { id, kitten }
    }
}

/// Testimonial record with its identifier
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TestimonialResponse {
    pub id: Option<String>,
    #[serde(flatten)]
    pub testimonial: Testimonial,
}

impl From<(String, Testimonial)> for TestimonialResponse {
    fn from((id, testimonial): (String, Testimonial)) -> Self {
        TestimonialResponse {
            id: Some(id),
            testimonial,
        }
    }
}
