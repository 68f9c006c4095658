pub mod interaction;
pub mod widget;
