mod app;
mod image;
mod quad;

use app::App;

fn main() {
    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Could not set up the demo: {e}");
            std::process::exit(1);
        }
    };

    app.run();
}
