//! Version command

use crate::app::AppContext;

/// Run the version command.
pub fn run(app: &AppContext) {
    let version = env!("CARGO_PKG_VERSION");

    if app.is_json() {
        println!("{}", serde_json::json!({ "version": version }));
    } else {
        app.renderer().render_version(version);
    }
}
