//! Record kinds accepted and served by the API.
//!
//! Each kind comes in two shapes: an `*Input` that clients post, carrying the
//! declarative field constraints, and the record itself with defaults applied.
//! Only records that passed validation are ever written to the store.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::store::Collection;

/// A stored record kind, bound to the collection that holds it.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

/// A client payload that becomes a [`Record`] once its constraints hold.
pub trait Payload: Validate + DeserializeOwned + Send {
    type Record: Record;

    /// Build the record, applying defaults. Only called on validated input.
    fn into_record(self) -> Self::Record;

    /// Check every field constraint and build the record.
    ///
    /// All violations are collected into one [`ValidationErrors`].
    fn validated(self) -> Result<Self::Record, ValidationErrors>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self.into_record())
    }
}

/// Absolute `http`/`https` URL with a host.
fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if is_http_url(value) {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("URL scheme should be 'http' or 'https'".into()))
    }
}

fn validate_image_urls(images: &[String]) -> Result<(), ValidationError> {
    if images.iter().all(|image| is_http_url(image)) {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("every image must be an http(s) URL".into()))
    }
}

fn default_giant() -> bool {
    true
}

fn default_status() -> String {
    "available".to_string()
}

fn default_rating() -> i64 {
    5
}

/// Kitten as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct KittenInput {
    /// Kitten name
    #[validate(required(message = "field required"))]
    pub name: Option<String>,
    /// Color/pattern, e.g. Smoke Black
    #[validate(required(message = "field required"))]
    pub color: Option<String>,
    /// Male or Female
    #[validate(required(message = "field required"))]
    pub sex: Option<String>,
    /// Age in weeks
    #[validate(range(min = 0, message = "ensure this value is greater than or equal to 0"))]
    pub age_weeks: Option<i64>,
    /// Miami, FL or Los Angeles, CA
    #[validate(required(message = "field required"))]
    pub location: Option<String>,
    /// Giant size tag, defaults to true
    pub giant: Option<bool>,
    /// Optional price for admin use
    #[validate(range(min = 0, message = "ensure this value is greater than or equal to 0"))]
    pub price_usd: Option<i64>,
    /// available / reserved / sold, defaults to available
    pub status: Option<String>,
    /// Primary + gallery image URLs
    #[validate(custom(function = "validate_image_urls"))]
    pub images: Option<Vec<String>>,
    /// Short personality notes
    pub description: Option<String>,
}

/// A kitten card, stored in the `kitten` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Kitten {
    pub name: String,
    pub color: String,
    pub sex: String,
    pub age_weeks: Option<i64>,
    pub location: String,
    #[serde(default = "default_giant")]
    pub giant: bool,
    pub price_usd: Option<i64>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: Option<String>,
}

impl Record for Kitten {
    const COLLECTION: Collection = Collection::Kitten;
}

impl Payload for KittenInput {
    type Record = Kitten;

    fn into_record(self) -> Kitten {
        Kitten {
            name: self.name.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            sex: self.sex.unwrap_or_default(),
            age_weeks: self.age_weeks,
            location: self.location.unwrap_or_default(),
            giant: self.giant.unwrap_or_else(default_giant),
            price_usd: self.price_usd,
            status: self.status.unwrap_or_else(default_status),
            images: self.images.unwrap_or_default(),
            description: self.description,
        }
    }
}

/// Waitlist/contact form submission as posted.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct InquiryInput {
    #[validate(required(message = "field required"))]
    pub name: Option<String>,
    #[validate(required(message = "field required"), email(message = "value is not a valid email address"))]
    pub email: Option<String>,
    /// Phone for text/FaceTime
    pub phone: Option<String>,
    pub preferred_color: Option<String>,
    pub location: Option<String>,
    /// text | facetime | email
    pub contact_method: Option<String>,
    pub message: Option<String>,
}

/// Stored in the `inquiry` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_color: Option<String>,
    pub location: Option<String>,
    pub contact_method: Option<String>,
    pub message: Option<String>,
}

impl Record for Inquiry {
    const COLLECTION: Collection = Collection::Inquiry;
}

impl Payload for InquiryInput {
    type Record = Inquiry;

    fn into_record(self) -> Inquiry {
        Inquiry {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
            preferred_color: self.preferred_color,
            location: self.location,
            contact_method: self.contact_method,
            message: self.message,
        }
    }
}

/// Testimonial as submitted. Testimonials are curated out of band, so no
/// route accepts this yet; it still defines what a stored one must satisfy.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct TestimonialInput {
    #[validate(required(message = "field required"))]
    pub author: Option<String>,
    /// Social handle like @giantcoonsfan
    pub handle: Option<String>,
    #[validate(required(message = "field required"))]
    pub content: Option<String>,
    /// 1 to 5, defaults to 5
    #[validate(range(min = 1, max = 5, message = "ensure this value is between 1 and 5"))]
    pub rating: Option<i64>,
    #[validate(custom(function = "validate_http_url"))]
    pub avatar_url: Option<String>,
    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,
}

/// Stored in the `testimonial` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Testimonial {
    pub author: String,
    pub handle: Option<String>,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: i64,
    pub avatar_url: Option<String>,
    pub image_url: Option<String>,
}

impl Record for Testimonial {
    const COLLECTION: Collection = Collection::Testimonial;
}

impl Payload for TestimonialInput {
    type Record = Testimonial;

    fn into_record(self) -> Testimonial {
        Testimonial {
            author: self.author.unwrap_or_default(),
            handle: self.handle,
            content: self.content.unwrap_or_default(),
            rating: self.rating.unwrap_or_else(default_rating),
            avatar_url: self.avatar_url,
            image_url: self.image_url,
        }
    }
}
