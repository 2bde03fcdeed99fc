// Route path constants - single source of truth for all API paths

pub const ROOT: &str = "/";
pub const DIAGNOSTICS: &str = "/test";
pub const KITTENS: &str = "/api/kittens";
pub const INQUIRIES: &str = "/api/inquiries";
pub const TESTIMONIALS: &str = "/api/testimonials";
pub const DOCS: &str = "/docs";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
