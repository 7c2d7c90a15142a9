pub mod hit;
pub mod paint;

pub use hit::{Handle, HandleParseError, handles, hit_test, hit_test_handle, hit_test_object};
pub use paint::{Frame, Surface, TextStyle, Theme, paint_board};
