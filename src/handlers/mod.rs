pub mod class_views;
pub mod fallback;
pub mod function_views;
pub mod generic_views;
pub mod health;
pub mod mixin_views;
pub mod users;
pub mod viewset;
