fn main() {
    paper_setup_lib::run()
}
