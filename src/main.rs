fn main() {
    if let Err(err) = kintree::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
