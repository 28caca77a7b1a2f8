pub mod category;
pub mod game;
pub mod game_category;
pub mod image;
pub mod rating;
pub mod review;
pub mod user;
