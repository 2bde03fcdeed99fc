use utoipa::OpenApi;

use crate::error::{ErrorResponse, FieldViolation, ValidationErrorResponse};
use crate::handlers;
use crate::models::{
    CreatedResponse, DiagnosticResponse, InquiryResponse, KittenResponse, MessageResponse,
    TestimonialResponse,
};
use crate::schema::{InquiryInput, Kitten, KittenInput, Testimonial};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gentle Giant Maine Coon API",
        version = "1.0.0",
        description = "Kitten listings, contact inquiries and testimonials for a Maine Coon breeder"
    ),
    paths(
        handlers::root::root_handler,
        handlers::diagnostics::diagnostics_handler,
        handlers::kittens::list_kittens_handler,
        handlers::kittens::create_kitten_handler,
        handlers::inquiries::create_inquiry_handler,
        handlers::testimonials::list_testimonials_handler
    ),
    components(
        schemas(
            MessageResponse,
            DiagnosticResponse,
            CreatedResponse,
            InquiryResponse,
            KittenInput,
            Kitten,
            KittenResponse,
            InquiryInput,
            Testimonial,
            TestimonialResponse,
            ErrorResponse,
            FieldViolation,
            ValidationErrorResponse
        )
    ),
    tags(
        (name = "health", description = "Liveness and diagnostics"),
        (name = "kittens", description = "Kitten listings"),
        (name = "inquiries", description = "Waitlist and contact submissions"),
        (name = "testimonials", description = "Customer testimonials")
    )
)]
pub struct ApiDoc;
