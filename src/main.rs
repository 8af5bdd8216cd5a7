fn main() {
    if let Err(err) = trendstats::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
