pub mod root;
pub mod diagnostics;
pub mod kittens;
pub mod inquiries;
pub mod testimonials;

pub use root::root_handler;
pub use diagnostics::diagnostics_handler;
pub use kittens::{create_kitten_handler, list_kittens_handler};
pub use inquiries::create_inquiry_handler;
pub use testimonials::list_testimonials_handler;
