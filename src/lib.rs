pub mod board;
pub mod config;
pub mod game;
pub mod game_loop;
pub mod shapes;
