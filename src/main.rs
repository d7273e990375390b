fn main() {
    if let Err(err) = column_probe::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
