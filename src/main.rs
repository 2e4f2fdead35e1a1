mod config;
mod polygon;
mod stage;
mod surface;
mod viewer;

use config::Config;
use viewer::App;

fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_platform();
    tracing::info!(?config, "starting");

    let mut app = App::new(config);
    app.run();
}
