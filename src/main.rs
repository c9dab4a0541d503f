fn main() {
    if let Err(err) = sheets2sql::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
