pub mod click;

pub use click::ClickService;
