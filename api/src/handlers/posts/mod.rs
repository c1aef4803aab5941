mod post_handlers;

pub use post_handlers::*;
