//! Pagination
//!
//! The next-page location for the Tempo API is embedded in the response body
//! (HATEOAS style). A paginator inspects the parsed body and either produces
//! an opaque continuation token or signals exhaustion with `None`.

mod strategies;
mod types;

pub use strategies::{NextUrlPaginator, NoPaginator};
pub use types::{PageToken, PaginationMode, Paginator};
