pub mod newtype_index;
pub mod stop_flag;
pub mod time;
