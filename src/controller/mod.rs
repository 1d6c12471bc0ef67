//! Request handling for the single page: rendering on GET, form
//! round-tripping through the session cookie on POST.

mod controller;
mod form;

pub use controller::{Controller, HttpMethod, HttpRequest, MAX_FORM_BYTES, Reply, apply_submission};
pub use form::FormSubmission;
