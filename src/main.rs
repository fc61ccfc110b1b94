//! attendlog main entrypoint.

use attendlog::run;
use attendlog::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
