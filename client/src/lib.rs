mod app;
mod canvas;
mod dom;
mod host;
mod logging;
mod state;

pub use app::run;
