pub mod page_info;

pub use page_info::PageInfo;
