fn main() {
    if let Err(err) = sales_insight::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
