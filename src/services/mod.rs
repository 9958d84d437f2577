pub mod keyword_search;
pub mod planner;
pub mod routing;

#[doc(hidden)]
pub mod test_support;
