fn main() {
    if let Err(e) = goscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
