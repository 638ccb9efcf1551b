mod app;
mod debounce;
mod models;
mod mvu;
mod ui;
mod utils;

fn main() -> eframe::Result<()> {
    app::run()
}
