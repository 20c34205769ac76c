fn main() {
    if let Err(e) = idr_justify_lib::run() {
        tracing::error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
