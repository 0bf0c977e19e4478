pub mod pagination;

pub use pagination::{Page, PageNumberPagination, PageQuery};
