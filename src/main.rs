fn main() {
    roadmap::cli::run();
}
