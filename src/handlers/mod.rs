pub mod blog_handlers;
pub mod health_handlers;
pub mod page_handlers;
pub mod trial_handlers;
