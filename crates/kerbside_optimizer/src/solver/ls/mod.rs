pub mod local_search;
pub mod r#move;
pub mod relocate;
pub mod swap;
pub mod two_opt;
pub mod two_opt_star;
